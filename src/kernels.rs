// OgmaNeo Rust port - actor kernels (forward, inhibit, learn)
//
// Each kernel works on a single hidden column and only touches that column's
// slice of the output, so a ComputeSystem may run columns in any order.

use crate::actor::{VisibleLayer, VisibleLayerDesc};
use crate::field::{column_weight_index, weights_per_column, ReceptiveField};
use crate::helpers::*;

/// Sum the receptive-field weights of every visible layer into the
/// activations of one hidden column.
///
/// `hidden_acts` is the column's slice (`hidden_size.z` cells). Field cells
/// hanging over a visible layer edge contribute nothing.
pub fn forward_column(
    hidden_column_index: usize,
    hidden_size: Int3,
    visible_layers: &[VisibleLayer],
    visible_layer_descs: &[VisibleLayerDesc],
    visible_cs: &[&[i32]],
    hidden_acts: &mut [f32],
) {
    let pos = column_pos(hidden_column_index, Int2::new(hidden_size.x, hidden_size.y));

    hidden_acts.fill(0.0);

    for (vli, (vl, vld)) in visible_layers.iter().zip(visible_layer_descs).enumerate() {
        let field = ReceptiveField::new(pos, vl.hidden_to_visible, vld.size, vld.radius);

        let per_column = weights_per_column(hidden_size.z, vld.radius, vld.size.z);
        let column_weights =
            &vl.weights[hidden_column_index * per_column..(hidden_column_index + 1) * per_column];
        let vl_visible_cs = visible_cs[vli];

        for (visible_column_index, offset) in field.positions() {
            let in_ci = vl_visible_cs[visible_column_index] as usize;
            let wi_start = column_weight_index(0, offset, in_ci, hidden_size.z, field.diam);

            for (hc, act) in hidden_acts.iter_mut().enumerate() {
                *act += column_weights[hc + wi_start];
            }
        }
    }
}

/// Arg-max over one column's activations. Ties go to the lowest index.
pub fn inhibit_column(hidden_acts: &[f32]) -> i32 {
    let mut max_index = 0usize;
    let mut max_activation = hidden_acts[0];

    for (hc, &act) in hidden_acts.iter().enumerate().skip(1) {
        if act > max_activation {
            max_activation = act;
            max_index = hc;
        }
    }

    max_index as i32
}

/// `reward + gamma * q_next - q_prev`, clamped to `[-td_clip, td_clip]`.
///
/// Panics unless `td_clip` is non-negative and not NaN. A NaN error stays NaN.
pub fn td_error(reward: f32, q_next: f32, q_prev: f32, gamma: f32, td_clip: f32) -> f32 {
    (reward + gamma * q_next - q_prev).clamp(-td_clip, td_clip)
}

/// Add `delta` to every weight that fed cell `target_ci` of one hidden column
/// from the previous step's visible code.
///
/// `column_weights` is the column's contiguous block of the visible layer's
/// weight tensor.
#[allow(clippy::too_many_arguments)]
pub fn learn_column(
    hidden_column_index: usize,
    hidden_size: Int3,
    hidden_to_visible: Float2,
    vld: &VisibleLayerDesc,
    visible_cs_prev: &[i32],
    target_ci: usize,
    delta: f32,
    column_weights: &mut [f32],
) {
    if delta == 0.0 {
        return;
    }

    let pos = column_pos(hidden_column_index, Int2::new(hidden_size.x, hidden_size.y));
    let field = ReceptiveField::new(pos, hidden_to_visible, vld.size, vld.radius);

    for (visible_column_index, offset) in field.positions() {
        let in_ci = visible_cs_prev[visible_column_index] as usize;
        let wi = column_weight_index(target_ci, offset, in_ci, hidden_size.z, field.diam);

        column_weights[wi] += delta;
    }
}
