//! Significance testing for comparing two batches of games.

use std::iter::Sum;

use num_traits::Float;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::{Result, WordleError};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Tails {
    #[allow(dead_code)]
    One,
    Two,
}

impl Tails {
    fn factor<N: Float>(self) -> N {
        match self {
            Self::One => N::one(),
            Self::Two => N::one() + N::one(),
        }
    }
}

/// Mean, size and unbiased variance of one sample.
#[derive(Debug, Clone, Copy)]
struct Moments<N: Float> {
    mean: N,
    len: N,
    var: N,
}

impl<N: Float + Sum> Moments<N> {
    fn of<T: IntoIterator<Item = N> + Clone>(sample: T) -> Result<Self> {
        let (count, sum) = sample
            .clone()
            .into_iter()
            .fold((0_u32, N::zero()), |(count, sum), x| (count + 1, sum + x));

        // variance needs at least two observations
        if count < 2 {
            return Err(WordleError::Stats);
        }
        let len = N::from(count).ok_or(WordleError::Stats)?;
        let mean = sum / len;
        let var = sample.into_iter().map(|x| (x - mean).powi(2)).sum::<N>() / (len - N::one());

        Ok(Moments { mean, len, var })
    }

    fn standard_error_sq(&self) -> N {
        self.var / self.len
    }
}

/// The outcome of Welch's unequal-variance t-test.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub(crate) struct WelchsT<N: Float> {
    /// The test statistic, positive when the first sample's mean is larger.
    pub(crate) t: N,

    /// Welch-Satterthwaite degrees of freedom.
    pub(crate) df: N,

    /// The probability of a difference at least this large if the means are
    /// in fact equal.
    pub(crate) p: N,

    /// The largest p-value still considered significant.
    pub(crate) alpha: N,

    #[allow(dead_code)]
    pub(crate) tails: Tails,
}

impl<N: Float + Sum + Into<f64>> WelchsT<N> {
    /// Runs the test on two samples.
    ///
    /// Fails with [`WordleError::Stats`] if either sample has fewer than two
    /// values, or if both have zero variance.
    ///
    /// # Panics
    ///
    /// `alpha` must be in (0, 1).
    pub(crate) fn two_sample<A, B>(a: A, b: B, alpha: N, tails: Tails) -> Result<Self>
    where
        A: IntoIterator<Item = N> + Clone,
        B: IntoIterator<Item = N> + Clone,
    {
        assert!(alpha > N::zero() && alpha < N::one());

        let a = Moments::of(a)?;
        let b = Moments::of(b)?;

        let (sa, sb) = (a.standard_error_sq(), b.standard_error_sq());
        let pooled = sa + sb;
        if pooled.into() <= f64::EPSILON {
            return Err(WordleError::Stats);
        }

        let t = (a.mean - b.mean) / pooled.sqrt();
        let df = pooled.powi(2)
            / (sa.powi(2) / (a.len - N::one()) + sb.powi(2) / (b.len - N::one()));

        let dist = StudentsT::new(0.0, 1.0, df.into()).map_err(|_| WordleError::Stats)?;
        let tail = N::from(dist.cdf(-t.abs().into())).ok_or(WordleError::Stats)?;
        let p = (tail * tails.factor::<N>()).min(N::one());

        Ok(Self {
            t,
            df,
            p,
            alpha,
            tails,
        })
    }

    pub(crate) fn is_significant(&self) -> bool {
        self.p < self.alpha
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use statrs::assert_almost_eq;

    use super::*;

    #[test]
    fn shifted_samples() -> Result<()> {
        let a = [1.0_f64, 2., 3., 4., 5.];
        let b = [2.0_f64, 3., 4., 5., 6.];
        let test = WelchsT::two_sample(a, b, 0.05, Tails::Two)?;

        assert_almost_eq!(test.t, -1.0, 1e-9);
        assert_almost_eq!(test.df, 8.0, 1e-9);
        // scipy.stats.ttest_ind(a, b, equal_var=False).pvalue
        assert_almost_eq!(test.p, 0.346_593_5, 1e-6);
        assert!(!test.is_significant());
        Ok(())
    }

    #[test]
    fn clearly_different_samples() -> Result<()> {
        let a: Vec<f64> = (0..50).map(|i| 3.0 + (i % 3) as f64).collect();
        let b: Vec<f64> = (0..50).map(|i| 6.0 + (i % 3) as f64).collect();
        let test = WelchsT::two_sample(a.iter().copied(), b.iter().copied(), 0.05, Tails::Two)?;

        assert!(test.t < 0.);
        assert!(test.is_significant());
        Ok(())
    }

    #[test]
    fn degenerate_samples_are_errors() {
        assert!(matches!(
            WelchsT::two_sample([4.0_f64], [3.0, 4.0], 0.05, Tails::Two),
            Err(WordleError::Stats)
        ));
        assert!(matches!(
            WelchsT::two_sample([4.0_f64, 4.0], [3.0, 3.0], 0.05, Tails::Two),
            Err(WordleError::Stats)
        ));
    }

    proptest! {
        #[test]
        fn symmetric(a in proptest::collection::vec(1.0_f64..10.0, 3..30), b in proptest::collection::vec(1.0_f64..10.0, 3..30)) {
            let forward = WelchsT::two_sample(a.iter().copied(), b.iter().copied(), 0.05, Tails::Two);
            let backward = WelchsT::two_sample(b.iter().copied(), a.iter().copied(), 0.05, Tails::Two);

            if let (Ok(forward), Ok(backward)) = (forward, backward) {
                prop_assert!((forward.p - backward.p).abs() < 1e-9);
                prop_assert!((forward.t + backward.t).abs() < 1e-9);
                prop_assert!(forward.p >= 0. && forward.p <= 1.);
            }
        }
    }
}
