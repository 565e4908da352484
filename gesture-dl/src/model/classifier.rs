//! Gesture classifier over landmark arrays.

use crate::common::*;

#[derive(Debug, Clone)]
pub struct GestureClassifierInit {
    pub num_classes: usize,
    pub hidden_dims: [usize; 3],
    pub dropout: f64,
}

impl GestureClassifierInit {
    pub fn new(num_classes: usize) -> Self {
        Self {
            num_classes,
            hidden_dims: [128, 64, 32],
            dropout: 0.3,
        }
    }

    pub fn build<'p, P>(self, path: P) -> Result<GestureClassifier>
    where
        P: Borrow<nn::Path<'p>>,
    {
        let path = path.borrow();
        let Self {
            num_classes,
            hidden_dims: [hidden1, hidden2, hidden3],
            dropout,
        } = self;
        ensure!(num_classes > 0, "num_classes must be positive");
        ensure!(
            (0.0..1.0).contains(&dropout),
            "dropout rate must be within [0, 1), but get {}",
            dropout
        );

        let linear = |name: &str, in_dim: usize, out_dim: usize| {
            nn::linear(path / name, in_dim as i64, out_dim as i64, Default::default())
        };

        Ok(GestureClassifier {
            fc1: linear("fc1", NUM_LANDMARKS * 3, hidden1),
            fc2: linear("fc2", hidden1, hidden2),
            fc3: linear("fc3", hidden2, hidden3),
            head: linear("head", hidden3, num_classes),
            num_classes,
            dropout,
        })
    }
}

/// Maps landmark arrays to a probability distribution over gesture classes.
#[derive(Debug)]
pub struct GestureClassifier {
    fc1: nn::Linear,
    fc2: nn::Linear,
    fc3: nn::Linear,
    head: nn::Linear,
    num_classes: usize,
    dropout: f64,
}

impl GestureClassifier {
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Accepts `[N, 21, 3]` or `[N, 63]` landmarks and returns `[N, num_classes]`
    /// probabilities.
    pub fn forward_t(&self, xs: &Tensor, train: bool) -> Result<Tensor> {
        let flat_len = NUM_LANDMARKS as i64 * 3;
        let xs = match xs.size().as_slice() {
            &[_, num_landmarks, 3] if num_landmarks == NUM_LANDMARKS as i64 => xs.flatten(1, -1),
            &[_, len] if len == flat_len => xs.shallow_clone(),
            shape => bail!(
                "expect landmarks of shape [N, 21, 3] or [N, 63], but get {:?}",
                shape
            ),
        };
        let dropout = self.dropout;

        let probs = xs
            .apply(&self.fc1)
            .relu()
            .dropout(dropout, train)
            .apply(&self.fc2)
            .relu()
            .dropout(dropout, train)
            .apply(&self.fc3)
            .relu()
            .apply(&self.head)
            .softmax(-1, Kind::Float);

        Ok(probs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outputs_are_distributions() -> Result<()> {
        let vs = nn::VarStore::new(Device::Cpu);
        let classifier = GestureClassifierInit::new(7).build(&vs.root())?;

        for train in [false, true] {
            let xs = Tensor::randn(&[16, 21, 3], FLOAT_CPU) * 10.0;
            let probs = classifier.forward_t(&xs, train)?;
            assert_eq!(probs.size(), vec![16, 7]);
            assert!(probs.min().double_value(&[]) >= 0.0);

            let sums = Vec::<f32>::from(probs.sum_dim_intlist(&[1], false, Kind::Float));
            for sum in sums {
                assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-5);
            }
        }
        Ok(())
    }

    #[test]
    fn flat_and_nested_inputs_agree() -> Result<()> {
        let vs = nn::VarStore::new(Device::Cpu);
        let classifier = GestureClassifierInit::new(4).build(&vs.root())?;

        let nested = Tensor::rand(&[3, 21, 3], FLOAT_CPU);
        let flat = nested.reshape(&[3, 63]);
        let lhs = classifier.forward_t(&nested, false)?;
        let rhs = classifier.forward_t(&flat, false)?;
        assert!(lhs.allclose(&rhs, 1e-6, 1e-6, false));

        assert!(classifier
            .forward_t(&Tensor::zeros(&[3, 20, 3], FLOAT_CPU), false)
            .is_err());
        assert!(classifier
            .forward_t(&Tensor::zeros(&[3, 62], FLOAT_CPU), false)
            .is_err());
        Ok(())
    }
}
