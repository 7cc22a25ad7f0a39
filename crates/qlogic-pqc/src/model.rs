//! Trainable two-qubit circuit model.

use std::f64::consts::FRAC_PI_2;

use ndarray::Axis;
use qlogic_adapter_sim::StatevectorSimulator;
use qlogic_ir::{Circuit, ClbitId, QubitId};
use tracing::{debug, info, instrument};

use crate::ansatz::{Ansatz, ansatz_for};
use crate::config::{CircuitConfig, Variant};
use crate::error::{PqcError, PqcResult};
use crate::gates::{Dataset, NUM_INPUTS};
use crate::optimizer::{Adam, AdamConfig};
use crate::params::{ParameterTensor, check_shape, init_params};

/// Map `<Z>` in `[-1, 1]` to the probability of measuring 1.
pub fn expval_to_prob(expval: f64) -> f64 {
    ((1.0 - expval) / 2.0).clamp(0.0, 1.0)
}

/// Per-row output of a trained model.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// P(1) for each row.
    pub probabilities: Vec<f64>,
    /// 1 iff P(1) >= 0.5.
    pub predictions: Vec<u8>,
    /// Expected outputs.
    pub targets: Vec<u8>,
}

impl Evaluation {
    /// Fraction of rows where the prediction matches the target.
    pub fn accuracy(&self) -> f64 {
        if self.targets.is_empty() {
            return 0.0;
        }
        let hits = self
            .predictions
            .iter()
            .zip(&self.targets)
            .filter(|(p, t)| p == t)
            .count();
        hits as f64 / self.targets.len() as f64
    }
}

/// A parameterized circuit on two qubits whose `<Z>` on qubit 0 is read as
/// the probability that the gate outputs 1.
#[derive(Debug)]
pub struct CircuitModel {
    config: CircuitConfig,
    ansatz: Box<dyn Ansatz>,
    simulator: StatevectorSimulator,
    params: ParameterTensor,
}

impl CircuitModel {
    /// Build the model for `config` with freshly initialized parameters.
    pub fn new(config: CircuitConfig) -> PqcResult<Self> {
        let base = config.base();
        let simulator = StatevectorSimulator::from_shots(base.shots(), base.seed())?
            .with_max_qubits(NUM_INPUTS);
        let ansatz = ansatz_for(&config);
        let params = init_params(base.num_blocks(), ansatz.params_per_wire(), base.seed());
        debug!(
            variant = %config.variant(),
            blocks = base.num_blocks(),
            shots = ?base.shots(),
            "model initialized"
        );
        Ok(Self {
            config,
            ansatz,
            simulator,
            params,
        })
    }

    /// The model configuration.
    pub fn config(&self) -> &CircuitConfig {
        &self.config
    }

    /// The circuit variant.
    pub fn variant(&self) -> Variant {
        self.config.variant()
    }

    /// Current parameters.
    pub fn params(&self) -> &ParameterTensor {
        &self.params
    }

    /// Shape every parameter tensor for this model must have.
    pub fn param_shape(&self) -> [usize; 3] {
        [
            self.config.base().num_blocks(),
            NUM_INPUTS,
            self.ansatz.params_per_wire(),
        ]
    }

    /// Replace the parameters.
    pub fn set_params(&mut self, params: ParameterTensor) -> PqcResult<()> {
        check_shape(&params, self.param_shape())?;
        self.params = params;
        Ok(())
    }

    /// Build the circuit for one input row: encoding, every block, then a
    /// measurement of qubit 0.
    pub fn circuit(&self, inputs: &[f64], params: &ParameterTensor) -> PqcResult<Circuit> {
        if inputs.len() != NUM_INPUTS {
            return Err(PqcError::InputLength {
                expected: NUM_INPUTS,
                got: inputs.len(),
            });
        }
        check_shape(params, self.param_shape())?;

        let name = format!("{}_pqc", self.variant());
        let mut circuit = Circuit::with_size(name, NUM_INPUTS as u32, 1);
        self.ansatz.encode(&mut circuit, inputs)?;
        for block in params.axis_iter(Axis(0)) {
            self.ansatz.block(&mut circuit, block, inputs)?;
        }
        circuit.measure(QubitId(0), ClbitId(0))?;
        Ok(circuit)
    }

    /// `<Z>` on qubit 0.
    pub fn expval(&mut self, inputs: &[f64], params: &ParameterTensor) -> PqcResult<f64> {
        let circuit = self.circuit(inputs, params)?;
        Ok(self.simulator.expval_z(&circuit, QubitId(0))?)
    }

    /// Mean squared error between P(1) and the targets.
    pub fn loss(&mut self, dataset: &Dataset, params: &ParameterTensor) -> PqcResult<f64> {
        if dataset.is_empty() {
            return Err(PqcError::EmptyDataset);
        }
        let mut total = 0.0;
        for sample in dataset {
            let prob = expval_to_prob(self.expval(&sample.inputs, params)?);
            total += (prob - sample.target).powi(2);
        }
        Ok(total / dataset.len() as f64)
    }

    /// Loss and its gradient by the parameter-shift rule.
    ///
    /// Every parameter drives exactly one Pauli rotation, so
    /// `dE/dp = (E(p + π/2) - E(p - π/2)) / 2` is exact.
    pub fn loss_and_gradient(
        &mut self,
        dataset: &Dataset,
        params: &ParameterTensor,
    ) -> PqcResult<(f64, ParameterTensor)> {
        if dataset.is_empty() {
            return Err(PqcError::EmptyDataset);
        }
        let n = dataset.len() as f64;
        let mut loss = 0.0;
        let mut grad = ParameterTensor::zeros(params.raw_dim());
        let mut shifted = params.clone();

        for sample in dataset {
            let prob = expval_to_prob(self.expval(&sample.inputs, params)?);
            let diff = prob - sample.target;
            loss += diff * diff;
            // d(diff²/n)/dE with prob = (1 - E) / 2
            let dloss_dexp = -diff / n;

            for (idx, &value) in params.indexed_iter() {
                shifted[idx] = value + FRAC_PI_2;
                let plus = self.expval(&sample.inputs, &shifted)?;
                shifted[idx] = value - FRAC_PI_2;
                let minus = self.expval(&sample.inputs, &shifted)?;
                shifted[idx] = value;
                grad[idx] += dloss_dexp * (plus - minus) / 2.0;
            }
        }
        Ok((loss / n, grad))
    }

    /// Train with Adam. Returns the loss recorded at each step, evaluated
    /// before that step's update.
    ///
    /// Stops after the first step whose loss is below `convergence_tol`,
    /// or after `max_steps`. The updated parameters replace the model's.
    #[instrument(skip_all, fields(variant = %self.variant()))]
    pub fn fit(&mut self, dataset: &Dataset) -> PqcResult<Vec<f64>> {
        let base = self.config.base().clone();
        let mut optimizer = Adam::new(AdamConfig::with_learning_rate(base.learning_rate()));
        let mut params = self.params.clone();
        let mut history = Vec::with_capacity(base.max_steps());

        for step in 0..base.max_steps() {
            let (loss, grad) = self.loss_and_gradient(dataset, &params)?;
            optimizer.step(&mut params, &grad);
            history.push(loss);
            debug!(step, loss, "training step");
            if loss < base.convergence_tol() {
                break;
            }
        }

        self.params = params;
        info!(
            steps = history.len(),
            final_loss = history.last().copied().unwrap_or(f64::INFINITY),
            "training finished"
        );
        Ok(history)
    }

    /// P(1) for one input row under the current parameters.
    pub fn predict_probability(&mut self, inputs: &[f64]) -> PqcResult<f64> {
        let circuit = self.circuit(inputs, &self.params)?;
        let expval = self.simulator.expval_z(&circuit, QubitId(0))?;
        Ok(expval_to_prob(expval))
    }

    /// Probabilities, thresholded predictions and targets for every row.
    pub fn evaluate(&mut self, dataset: &Dataset) -> PqcResult<Evaluation> {
        let mut probabilities = Vec::with_capacity(dataset.len());
        let mut predictions = Vec::with_capacity(dataset.len());
        let mut targets = Vec::with_capacity(dataset.len());
        for sample in dataset {
            let prob = self.predict_probability(&sample.inputs)?;
            probabilities.push(prob);
            predictions.push(u8::from(prob >= 0.5));
            targets.push(u8::from(sample.target >= 0.5));
        }
        Ok(Evaluation {
            probabilities,
            predictions,
            targets,
        })
    }
}
