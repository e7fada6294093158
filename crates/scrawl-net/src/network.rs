//! Network - Feed-forward inference
//!
//! A plain fully connected network: each layer computes
//! `activation(W.x + b)`. Weights are loaded once at construction from
//! a binary stream and never change.
//!
//! # Weight stream format
//!
//! Big-endian, in this order:
//!
//! ```text
//! layer_count: i32
//! layer_sizes: i32 x layer_count
//! for each layer:
//!     for each neuron:
//!         bias: f64
//!         weights: f64 x input_size
//! ```

use std::io::Read;

use crate::error::{NetError, NetResult};

/// Elementwise nonlinearity applied after each layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activation {
    /// Rectifier: `max(0, z)`
    #[default]
    Relu,
    /// Logistic sigmoid: `1 / (1 + exp(-z))`
    Sigmoid,
}

impl Activation {
    /// Apply the nonlinearity.
    #[inline]
    pub fn apply(self, z: f64) -> f64 {
        match self {
            Activation::Relu => z.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-z).exp()),
        }
    }
}

/// One fully connected layer.
#[derive(Debug, Clone)]
struct Layer {
    inputs: usize,
    outputs: usize,
    /// One bias per output neuron
    biases: Vec<f64>,
    /// Row-major `outputs x inputs`
    weights: Vec<f64>,
}

impl Layer {
    fn forward(&self, input: &[f64], activation: Activation, output: &mut Vec<f64>) {
        output.clear();
        for neuron in 0..self.outputs {
            let row = &self.weights[neuron * self.inputs..(neuron + 1) * self.inputs];
            let sum: f64 = row.iter().zip(input).map(|(w, x)| w * x).sum();
            output.push(activation.apply(sum + self.biases[neuron]));
        }
    }
}

/// A feed-forward neural network.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    activation: Activation,
}

impl Network {
    /// Build a network from layer sizes and a flat parameter vector in
    /// weight-stream order (per layer, per neuron: bias then weights).
    ///
    /// # Errors
    ///
    /// Returns [`NetError::BadLayerCount`] / [`NetError::BadLayerSize`]
    /// for inconsistent sizes and [`NetError::ParameterCount`] if the
    /// parameter vector does not match them.
    pub fn from_parameters(
        sizes: &[usize],
        parameters: &[f64],
        activation: Activation,
    ) -> NetResult<Self> {
        if sizes.len() < 2 {
            return Err(NetError::BadLayerCount(sizes.len() as i32));
        }
        if let Some(&zero) = sizes.iter().find(|&&s| s == 0) {
            return Err(NetError::BadLayerSize(zero as i32));
        }

        let expected: usize = sizes.windows(2).map(|w| w[1] * (w[0] + 1)).sum();
        if parameters.len() != expected {
            return Err(NetError::ParameterCount {
                expected,
                actual: parameters.len(),
            });
        }

        let mut layers = Vec::with_capacity(sizes.len() - 1);
        let mut cursor = 0usize;
        for pair in sizes.windows(2) {
            let (inputs, outputs) = (pair[0], pair[1]);
            let mut biases = Vec::with_capacity(outputs);
            let mut weights = Vec::with_capacity(outputs * inputs);
            for _ in 0..outputs {
                biases.push(parameters[cursor]);
                cursor += 1;
                weights.extend_from_slice(&parameters[cursor..cursor + inputs]);
                cursor += inputs;
            }
            layers.push(Layer {
                inputs,
                outputs,
                biases,
                weights,
            });
        }

        Ok(Self { layers, activation })
    }

    /// Load a network from a binary weight stream.
    ///
    /// The stream is consumed once; a truncated or inconsistent stream
    /// is a construction error.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::Io`] on short reads and
    /// [`NetError::BadLayerCount`] / [`NetError::BadLayerSize`] for
    /// nonsensical declared sizes.
    pub fn from_reader(mut reader: impl Read, activation: Activation) -> NetResult<Self> {
        let layer_count = read_i32(&mut reader)?;
        if layer_count < 2 {
            return Err(NetError::BadLayerCount(layer_count));
        }

        let mut sizes = Vec::with_capacity(layer_count as usize);
        for _ in 0..layer_count {
            let size = read_i32(&mut reader)?;
            if size <= 0 {
                return Err(NetError::BadLayerSize(size));
            }
            sizes.push(size as usize);
        }

        let parameter_count: usize = sizes.windows(2).map(|w| w[1] * (w[0] + 1)).sum();
        let mut parameters = Vec::with_capacity(parameter_count);
        for _ in 0..parameter_count {
            parameters.push(read_f64(&mut reader)?);
        }

        Self::from_parameters(&sizes, &parameters, activation)
    }

    /// The declared size of each layer, input layer first.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.layers.len() + 1);
        sizes.push(self.input_len());
        sizes.extend(self.layers.iter().map(|l| l.outputs));
        sizes
    }

    /// Width of the input layer.
    #[inline]
    pub fn input_len(&self) -> usize {
        self.layers.first().map(|l| l.inputs).unwrap_or(0)
    }

    /// Width of the output layer.
    #[inline]
    pub fn output_len(&self) -> usize {
        self.layers.last().map(|l| l.outputs).unwrap_or(0)
    }

    /// The configured nonlinearity.
    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Run the forward pass.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::InputLength`] if `input` does not match the
    /// first layer width.
    pub fn feed_forward(&self, input: &[f64]) -> NetResult<Vec<f64>> {
        if input.len() != self.input_len() {
            return Err(NetError::InputLength {
                expected: self.input_len(),
                actual: input.len(),
            });
        }

        let mut current = input.to_vec();
        let mut next = Vec::new();
        for layer in &self.layers {
            layer.forward(&current, self.activation, &mut next);
            std::mem::swap(&mut current, &mut next);
        }
        Ok(current)
    }
}

fn read_i32(reader: &mut impl Read) -> NetResult<i32> {
    let mut buffer = [0u8; 4];
    reader.read_exact(&mut buffer)?;
    Ok(i32::from_be_bytes(buffer))
}

fn read_f64(reader: &mut impl Read) -> NetResult<f64> {
    let mut buffer = [0u8; 8];
    reader.read_exact(&mut buffer)?;
    Ok(f64::from_be_bytes(buffer))
}
