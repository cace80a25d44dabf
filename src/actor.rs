// OgmaNeo Rust port - Actor (reward-driven sparse action layer)

use rand::Rng;

use crate::compute::ComputeSystem;
use crate::error::{ActorError, Result};
use crate::field::weights_per_column;
use crate::helpers::*;
use crate::kernels;

/// Shape of one visible (input) layer and its receptive field onto the
/// hidden layer. Fixed after [`Actor::init_random`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleLayerDesc {
    pub size: Int3,
    pub radius: i32,
}

impl Default for VisibleLayerDesc {
    fn default() -> Self {
        Self {
            size: Int3::new(4, 4, 16),
            radius: 2,
        }
    }
}

/// Per-input state owned by the [`Actor`]. Read through the accessors;
/// restore weights with [`Actor::set_weights`].
#[derive(Clone, Debug, Default)]
pub struct VisibleLayer {
    // visible code from the previous step (what learning credits)
    pub(crate) visible_cs: IntBuffer,
    pub(crate) weights: FloatBuffer,
    pub(crate) hidden_to_visible: Float2,
}

impl VisibleLayer {
    /// Visible code stored by the most recent step.
    pub fn visible_cs(&self) -> &[i32] {
        &self.visible_cs
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn hidden_to_visible(&self) -> Float2 {
        self.hidden_to_visible
    }
}

/// Learning hyperparameters, passed to every [`Actor::step`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Params {
    /// Learning rate.
    pub alpha: f32,
    /// Discount factor applied to the current step's selected activation.
    pub gamma: f32,
    /// TD errors are clamped to `[-td_clip, td_clip]`. Must be non-negative.
    pub td_clip: f32,
}

impl Params {
    /// Finite `alpha` and `gamma`, finite non-negative `td_clip`.
    pub fn validate(&self) -> Result<()> {
        if self.alpha.is_finite()
            && self.gamma.is_finite()
            && self.td_clip.is_finite()
            && self.td_clip >= 0.0
        {
            Ok(())
        } else {
            Err(ActorError::InvalidParams {
                alpha: self.alpha,
                gamma: self.gamma,
                td_clip: self.td_clip,
            })
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            alpha: 0.01,
            gamma: 0.99,
            td_clip: 10.0,
        }
    }
}

/// Single actor layer: maps visible sparse codes onto one chosen cell per
/// hidden column and adapts toward rewarded actions.
///
/// Each [`step`](Self::step) runs forward, inhibit and (optionally) learn as
/// separate dispatches on the supplied [`ComputeSystem`]. Hidden activations
/// are double buffered so learning can compare this step's values with the
/// previous step's.
#[derive(Clone, Debug, Default)]
pub struct Actor {
    hidden_size: Int3,
    hidden_cs: IntBuffer,
    hidden_activations: DoubleBuffer<f32>,
    visible_layers: Vec<VisibleLayer>,
    visible_layer_descs: Vec<VisibleLayerDesc>,
}

impl Actor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate all buffers and draw every weight from `U[-0.01, 0.01]`.
    ///
    /// Codes and activations start at zero. On error nothing is changed.
    pub fn init_random<R: Rng>(
        &mut self,
        hidden_size: Int3,
        visible_layer_descs: Vec<VisibleLayerDesc>,
        rng: &mut R,
    ) -> Result<()> {
        if !hidden_size.is_positive() {
            return Err(ActorError::InvalidHiddenSize(hidden_size));
        }

        if visible_layer_descs.is_empty() {
            return Err(ActorError::NoVisibleLayers);
        }

        for (index, vld) in visible_layer_descs.iter().enumerate() {
            if !vld.size.is_positive() || vld.radius < 0 {
                return Err(ActorError::InvalidVisibleLayerDesc {
                    index,
                    size: vld.size,
                    radius: vld.radius,
                });
            }
        }

        let num_hidden_columns = hidden_size.num_columns();

        self.visible_layers = visible_layer_descs
            .iter()
            .map(|vld| {
                let num_weights = num_hidden_columns
                    * weights_per_column(hidden_size.z, vld.radius, vld.size.z);

                let weights: FloatBuffer = (0..num_weights)
                    .map(|_| rng.gen_range(-INIT_WEIGHT_NOISEF..=INIT_WEIGHT_NOISEF))
                    .collect();

                VisibleLayer {
                    visible_cs: vec![0i32; vld.size.num_columns()],
                    weights,
                    hidden_to_visible: hidden_to_visible(hidden_size, vld.size),
                }
            })
            .collect();

        self.visible_layer_descs = visible_layer_descs;
        self.hidden_size = hidden_size;
        self.hidden_cs = vec![0i32; num_hidden_columns];
        self.hidden_activations = DoubleBuffer::new(hidden_size.num_cells());

        log::debug!(
            "[ACTOR] init: hidden {}x{}x{}, {} visible layers, {} weights",
            hidden_size.x,
            hidden_size.y,
            hidden_size.z,
            self.visible_layers.len(),
            self.visible_layers.iter().map(|vl| vl.weights.len()).sum::<usize>()
        );

        Ok(())
    }

    /// Advance one timestep.
    ///
    /// `visible_cs` needs one code per visible layer. `target_cs` is the
    /// action actually taken, one cell per hidden column; `reward` is the
    /// reward that action earned. Learning only runs when `learn_enabled`.
    ///
    /// Inputs are checked before anything runs; on error the actor is
    /// untouched.
    pub fn step<C: ComputeSystem>(
        &mut self,
        cs: &C,
        visible_cs: &[&[i32]],
        target_cs: &[i32],
        reward: f32,
        learn_enabled: bool,
        params: &Params,
    ) -> Result<()> {
        self.validate_step(visible_cs, target_cs, reward)?;
        params.validate()?;

        let hidden_size = self.hidden_size;
        let column_size = hidden_size.z as usize;

        // forward
        {
            let visible_layers = &self.visible_layers;
            let visible_layer_descs = &self.visible_layer_descs;

            cs.for_each_chunk_mut(
                self.hidden_activations.front_mut(),
                column_size,
                |i, hidden_acts| {
                    kernels::forward_column(
                        i,
                        hidden_size,
                        visible_layers,
                        visible_layer_descs,
                        visible_cs,
                        hidden_acts,
                    )
                },
            );
        }

        // inhibit
        {
            let hidden_acts = self.hidden_activations.front();

            cs.for_each_chunk_mut(&mut self.hidden_cs, 1, |i, hidden_ci| {
                hidden_ci[0] = kernels::inhibit_column(
                    &hidden_acts[i * column_size..(i + 1) * column_size],
                );
            });
        }

        if learn_enabled {
            self.learn(cs, target_cs, reward, params);
        }

        for (vl, vl_visible_cs) in self.visible_layers.iter_mut().zip(visible_cs) {
            vl.visible_cs.copy_from_slice(vl_visible_cs);
        }

        self.hidden_activations.swap();

        Ok(())
    }

    // Reads the pre-swap buffers: front holds this step, back the previous one.
    fn learn<C: ComputeSystem>(&mut self, cs: &C, target_cs: &[i32], reward: f32, params: &Params) {
        let hidden_size = self.hidden_size;
        let column_size = hidden_size.z as usize;

        let (hidden_acts, hidden_acts_prev) = self.hidden_activations.split();
        let hidden_cs = &self.hidden_cs;

        let td_errors: FloatBuffer = cs.map_range(hidden_size.num_columns(), |i| {
            let hidden_cells_start = i * column_size;
            let q_next = hidden_acts[hidden_cells_start + hidden_cs[i] as usize];
            let q_prev = hidden_acts_prev[hidden_cells_start + target_cs[i] as usize];

            kernels::td_error(reward, q_next, q_prev, params.gamma, params.td_clip)
        });

        for (vl, vld) in self.visible_layers.iter_mut().zip(&self.visible_layer_descs) {
            let per_column = weights_per_column(hidden_size.z, vld.radius, vld.size.z);
            let h_to_v = vl.hidden_to_visible;
            let visible_cs_prev = &vl.visible_cs;
            let td_errors = &td_errors;

            cs.for_each_chunk_mut(&mut vl.weights, per_column, |i, column_weights| {
                kernels::learn_column(
                    i,
                    hidden_size,
                    h_to_v,
                    vld,
                    visible_cs_prev,
                    target_cs[i] as usize,
                    params.alpha * td_errors[i],
                    column_weights,
                )
            });
        }

        log::trace!(
            "[ACTOR] learn: reward={}, mean |td|={:.5}",
            reward,
            td_errors.iter().map(|td| td.abs()).sum::<f32>() / td_errors.len() as f32
        );
    }

    fn validate_step(&self, visible_cs: &[&[i32]], target_cs: &[i32], reward: f32) -> Result<()> {
        if !self.hidden_size.is_positive() {
            return Err(ActorError::InvalidHiddenSize(self.hidden_size));
        }

        if visible_cs.len() != self.visible_layers.len() {
            return Err(ActorError::VisibleLayerCount {
                expected: self.visible_layers.len(),
                actual: visible_cs.len(),
            });
        }

        for (index, (vl_visible_cs, vld)) in
            visible_cs.iter().zip(&self.visible_layer_descs).enumerate()
        {
            let expected = vld.size.num_columns();
            if vl_visible_cs.len() != expected {
                return Err(ActorError::VisibleCodeLength {
                    index,
                    expected,
                    actual: vl_visible_cs.len(),
                });
            }

            if let Some(column) = vl_visible_cs.iter().position(|&ci| ci < 0 || ci >= vld.size.z) {
                return Err(ActorError::VisibleCodeOutOfRange {
                    index,
                    column,
                    value: vl_visible_cs[column],
                    column_size: vld.size.z,
                });
            }
        }

        let num_hidden_columns = self.hidden_size.num_columns();
        if target_cs.len() != num_hidden_columns {
            return Err(ActorError::TargetCodeLength {
                expected: num_hidden_columns,
                actual: target_cs.len(),
            });
        }

        if let Some(column) = target_cs
            .iter()
            .position(|&ci| ci < 0 || ci >= self.hidden_size.z)
        {
            return Err(ActorError::TargetCodeOutOfRange {
                column,
                value: target_cs[column],
                column_size: self.hidden_size.z,
            });
        }

        if !reward.is_finite() {
            return Err(ActorError::NonFiniteReward(reward));
        }

        Ok(())
    }

    /// Replace one visible layer's weights, e.g. when restoring a checkpoint.
    pub fn set_weights(&mut self, i: usize, weights: &[f32]) -> Result<()> {
        let vl = self.visible_layer_checked_mut(i)?;

        if weights.len() != vl.weights.len() {
            return Err(ActorError::WeightsLength {
                index: i,
                expected: vl.weights.len(),
                actual: weights.len(),
            });
        }

        vl.weights.copy_from_slice(weights);

        Ok(())
    }

    /// Replace the stored previous-step code of one visible layer.
    pub fn set_visible_cs(&mut self, i: usize, visible_cs: &[i32]) -> Result<()> {
        let num_layers = self.visible_layers.len();
        let vld = self
            .visible_layer_descs
            .get(i)
            .ok_or(ActorError::VisibleLayerIndex {
                index: i,
                count: num_layers,
            })?;

        if visible_cs.len() != vld.size.num_columns() {
            return Err(ActorError::VisibleCodeLength {
                index: i,
                expected: vld.size.num_columns(),
                actual: visible_cs.len(),
            });
        }

        if let Some(column) = visible_cs.iter().position(|&ci| ci < 0 || ci >= vld.size.z) {
            return Err(ActorError::VisibleCodeOutOfRange {
                index: i,
                column,
                value: visible_cs[column],
                column_size: vld.size.z,
            });
        }

        self.visible_layers[i].visible_cs.copy_from_slice(visible_cs);

        Ok(())
    }

    fn visible_layer_checked_mut(&mut self, i: usize) -> Result<&mut VisibleLayer> {
        let count = self.visible_layers.len();
        self.visible_layers
            .get_mut(i)
            .ok_or(ActorError::VisibleLayerIndex { index: i, count })
    }

    /// Zero codes, activations and stored visible codes. Weights are kept.
    pub fn clear_state(&mut self) {
        self.hidden_cs.fill(0);
        self.hidden_activations.fill(0.0);

        for vl in &mut self.visible_layers {
            vl.visible_cs.fill(0);
        }
    }

    pub fn get_hidden_cs(&self) -> &[i32] {
        &self.hidden_cs
    }

    /// Activations computed by the most recent step (zeros before the first).
    pub fn get_hidden_activations(&self) -> &[f32] {
        // step() swaps after learning, so the latest values are in the back
        self.hidden_activations.back()
    }

    pub fn get_hidden_size(&self) -> Int3 {
        self.hidden_size
    }

    pub fn get_num_visible_layers(&self) -> usize {
        self.visible_layers.len()
    }

    pub fn get_visible_layer(&self, i: usize) -> &VisibleLayer {
        &self.visible_layers[i]
    }

    pub fn get_visible_layer_desc(&self, i: usize) -> &VisibleLayerDesc {
        &self.visible_layer_descs[i]
    }

    pub fn get_weights(&self, i: usize) -> &[f32] {
        &self.visible_layers[i].weights
    }
}
