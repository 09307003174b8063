use crate::*;
use candle_core::D;
use candle_core::DType;
use candle_core::Device;
use candle_core::Tensor;
use candle_nn::AdamW;
use candle_nn::Linear;
use candle_nn::Module;
use candle_nn::Optimizer;
use candle_nn::VarBuilder;
use candle_nn::VarMap;
use std::collections::BTreeMap;

/// One named weight tensor, flattened for serialization.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Parameter {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

/// All network weights by variable name.
pub type Weights = BTreeMap<String, Parameter>;

/// Policy function: state encoding in, distribution over the 676 placements out.
///
/// Three ReLU hidden layers of equal width feed a linear head; the head's
/// logits are softmaxed over the full action space. Legal-move masking is
/// the caller's job.
pub struct PolicyNetwork {
    fc1: Linear,
    fc2: Linear,
    fc3: Linear,
    head: Linear,
    varmap: VarMap,
    optimizer: AdamW,
    device: Device,
}

impl PolicyNetwork {
    pub fn new(hidden: usize, learning_rate: f64) -> anyhow::Result<Self> {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let fc1 = candle_nn::linear(ENCODING_SIZE, hidden, vb.pp("fc1"))?;
        let fc2 = candle_nn::linear(hidden, hidden, vb.pp("fc2"))?;
        let fc3 = candle_nn::linear(hidden, hidden, vb.pp("fc3"))?;
        let head = candle_nn::linear(hidden, ACTION_SPACE, vb.pp("head"))?;
        let optimizer = AdamW::new_lr(varmap.all_vars(), learning_rate)?;
        Ok(Self {
            fc1,
            fc2,
            fc3,
            head,
            varmap,
            optimizer,
            device,
        })
    }

    /// Softmax probabilities over every placement for one encoded state.
    pub fn probabilities(&self, encoding: &[f32]) -> anyhow::Result<Vec<f32>> {
        let x = self.input(encoding)?;
        let p = candle_nn::ops::softmax(&self.logits(&x)?, D::Minus1)?;
        Ok(p.squeeze(0)?.to_vec1::<f32>()?)
    }

    /// One policy-gradient step: minimize `-reward * log p(action | state)`.
    pub fn reinforce(
        &mut self,
        encoding: &[f32],
        action: usize,
        reward: Utility,
    ) -> anyhow::Result<f32> {
        let x = self.input(encoding)?;
        let logp = candle_nn::ops::log_softmax(&self.logits(&x)?, D::Minus1)?;
        let loss = logp
            .squeeze(0)?
            .get(action)?
            .affine(-(reward as f64), 0.0)?;
        self.optimizer.backward_step(&loss)?;
        Ok(loss.to_scalar::<f32>()?)
    }

    /// One cross-entropy step toward a target distribution given as sparse
    /// `(action, probability)` pairs.
    pub fn distill(&mut self, encoding: &[f32], target: &[(usize, Probability)]) -> anyhow::Result<f32> {
        let mut dense = vec![0.0f32; ACTION_SPACE];
        for (i, p) in target.iter().filter(|(i, _)| *i < ACTION_SPACE) {
            dense[*i] += *p;
        }
        let target = Tensor::from_vec(dense, (1, ACTION_SPACE), &self.device)?;
        let x = self.input(encoding)?;
        let logp = candle_nn::ops::log_softmax(&self.logits(&x)?, D::Minus1)?;
        let loss = logp.mul(&target)?.sum_all()?.neg()?;
        self.optimizer.backward_step(&loss)?;
        Ok(loss.to_scalar::<f32>()?)
    }

    /// Snapshot of every weight tensor.
    pub fn weights(&self) -> anyhow::Result<Weights> {
        let data = self
            .varmap
            .data()
            .lock()
            .map_err(|e| anyhow::anyhow!("failed to lock varmap: {}", e))?;
        let weights = data
            .iter()
            .map(|(name, var)| -> anyhow::Result<(String, Parameter)> {
                let tensor = var.as_tensor();
                let parameter = Parameter {
                    shape: tensor.dims().to_vec(),
                    data: tensor.flatten_all()?.to_vec1::<f32>()?,
                };
                Ok((name.clone(), parameter))
            })
            .collect::<anyhow::Result<Weights>>()?;
        Ok(weights)
    }

    /// Overwrites weights by name. Every variable must be present with a
    /// matching shape. The optimizer restarts with fresh moments, since
    /// moments gathered for the old weights do not describe the new ones.
    pub fn load(&mut self, weights: &Weights) -> anyhow::Result<()> {
        {
            let data = self
                .varmap
                .data()
                .lock()
                .map_err(|e| anyhow::anyhow!("failed to lock varmap: {}", e))?;
            for (name, var) in data.iter() {
                let parameter = weights
                    .get(name)
                    .ok_or_else(|| anyhow::anyhow!("missing weight {}", name))?;
                if parameter.shape != var.as_tensor().dims() {
                    anyhow::bail!("shape mismatch for {}: {:?}", name, parameter.shape);
                }
                let tensor = Tensor::from_vec(
                    parameter.data.clone(),
                    parameter.shape.as_slice(),
                    &self.device,
                )?;
                var.set(&tensor)?;
            }
        }
        let learning_rate = self.optimizer.learning_rate();
        self.optimizer = AdamW::new_lr(self.varmap.all_vars(), learning_rate)?;
        Ok(())
    }

    fn input(&self, encoding: &[f32]) -> anyhow::Result<Tensor> {
        if encoding.len() != ENCODING_SIZE {
            anyhow::bail!("encoding has {} values, expected {}", encoding.len(), ENCODING_SIZE);
        }
        Ok(Tensor::from_slice(encoding, (1, ENCODING_SIZE), &self.device)?)
    }
    fn logits(&self, x: &Tensor) -> candle_core::Result<Tensor> {
        let x = self.fc1.forward(x)?.relu()?;
        let x = self.fc2.forward(&x)?.relu()?;
        let x = self.fc3.forward(&x)?.relu()?;
        self.head.forward(&x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoding() -> Vec<f32> {
        (0..ENCODING_SIZE).map(|i| (i % 3) as f32 / 2.0).collect()
    }

    #[test]
    fn outputs_a_distribution() {
        let network = PolicyNetwork::new(16, LEARNING_RATE).unwrap();
        let p = network.probabilities(&encoding()).unwrap();
        assert_eq!(p.len(), ACTION_SPACE);
        assert!((p.iter().sum::<f32>() - 1.0).abs() < 1e-3);
        assert!(p.iter().all(|x| *x >= 0.0));
    }

    #[test]
    fn rejects_wrong_width() {
        let network = PolicyNetwork::new(16, LEARNING_RATE).unwrap();
        assert!(network.probabilities(&[0.0; 10]).is_err());
    }

    #[test]
    fn positive_reward_raises_probability() {
        let mut network = PolicyNetwork::new(16, 0.01).unwrap();
        let x = encoding();
        let before = network.probabilities(&x).unwrap()[7];
        for _ in 0..20 {
            network.reinforce(&x, 7, 1.0).unwrap();
        }
        let after = network.probabilities(&x).unwrap()[7];
        assert!(after > before);
    }

    #[test]
    fn distillation_moves_toward_target() {
        let mut network = PolicyNetwork::new(16, 0.01).unwrap();
        let x = encoding();
        let before = network.probabilities(&x).unwrap()[42];
        for _ in 0..20 {
            network.distill(&x, &[(42, 1.0)]).unwrap();
        }
        assert!(network.probabilities(&x).unwrap()[42] > before);
    }

    #[test]
    fn weights_transfer() {
        let source = PolicyNetwork::new(16, LEARNING_RATE).unwrap();
        let mut target = PolicyNetwork::new(16, LEARNING_RATE).unwrap();
        target.load(&source.weights().unwrap()).unwrap();
        let x = encoding();
        assert_eq!(
            source.probabilities(&x).unwrap(),
            target.probabilities(&x).unwrap()
        );
        let mut narrow = PolicyNetwork::new(8, LEARNING_RATE).unwrap();
        assert!(narrow.load(&source.weights().unwrap()).is_err());
    }

    #[test]
    fn loading_restarts_the_optimizer() {
        let x = encoding();
        let weights = PolicyNetwork::new(16, 0.01).unwrap().weights().unwrap();
        let mut warm = PolicyNetwork::new(16, 0.01).unwrap();
        for _ in 0..5 {
            warm.reinforce(&x, 3, 1.0).unwrap();
        }
        warm.load(&weights).unwrap();
        let mut cold = PolicyNetwork::new(16, 0.01).unwrap();
        cold.load(&weights).unwrap();
        warm.reinforce(&x, 9, 1.0).unwrap();
        cold.reinforce(&x, 9, 1.0).unwrap();
        assert_eq!(
            warm.probabilities(&x).unwrap(),
            cold.probabilities(&x).unwrap()
        );
    }
}
