// OgmaNeo Rust port - helpers module

// --- Constants ---

pub const INIT_WEIGHT_NOISEF: f32 = 0.01;

// --- Type aliases ---

pub type IntBuffer = Vec<i32>;
pub type FloatBuffer = Vec<f32>;

// --- Vector types ---

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Int2 {
    pub x: i32,
    pub y: i32,
}

impl Int2 {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Int3 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Int3 {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Number of spatial columns (`x * y`).
    pub fn num_columns(&self) -> usize {
        (self.x * self.y) as usize
    }

    /// Number of cells over all columns (`x * y * z`).
    pub fn num_cells(&self) -> usize {
        self.num_columns() * self.z as usize
    }

    pub fn is_positive(&self) -> bool {
        self.x > 0 && self.y > 0 && self.z > 0
    }
}

#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct Float2 {
    pub x: f32,
    pub y: f32,
}

impl Float2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

// --- Projections ---

/// Scale factors taking hidden coordinates onto a visible layer of `visible_size`.
pub fn hidden_to_visible(hidden_size: Int3, visible_size: Int3) -> Float2 {
    Float2::new(
        visible_size.x as f32 / hidden_size.x as f32,
        visible_size.y as f32 / hidden_size.y as f32,
    )
}

pub fn project(pos: Int2, to_scalars: Float2) -> Int2 {
    Int2::new(
        ((pos.x as f32 + 0.5) * to_scalars.x) as i32,
        ((pos.y as f32 + 0.5) * to_scalars.y) as i32,
    )
}

// --- Addressing (row-major) ---

pub fn address2(pos: Int2, dims: Int2) -> usize {
    (pos.y + pos.x * dims.y) as usize
}

/// Inverse of [`address2`] for a column grid of height `dims.y`.
pub fn column_pos(column_index: usize, dims: Int2) -> Int2 {
    Int2::new(
        (column_index / dims.y as usize) as i32,
        (column_index % dims.y as usize) as i32,
    )
}

// --- DoubleBuffer ---

/// Two equally sized buffers with a one-bit front selector.
///
/// Writers fill the front while readers still see last step's values in the
/// back. [`swap`](Self::swap) flips the selector; nothing is reallocated.
#[derive(Clone, Debug, Default)]
pub struct DoubleBuffer<T> {
    buffers: [Vec<T>; 2],
    front: usize,
}

impl<T: Clone + Default> DoubleBuffer<T> {
    pub fn new(size: usize) -> Self {
        Self {
            buffers: [vec![T::default(); size], vec![T::default(); size]],
            front: 0,
        }
    }

    pub fn front(&self) -> &[T] {
        &self.buffers[self.front]
    }

    pub fn back(&self) -> &[T] {
        &self.buffers[1 - self.front]
    }

    pub fn front_mut(&mut self) -> &mut [T] {
        &mut self.buffers[self.front]
    }

    /// Borrow `(front, back)` at once.
    pub fn split(&self) -> (&[T], &[T]) {
        (self.front(), self.back())
    }

    pub fn swap(&mut self) {
        self.front = 1 - self.front;
    }

    pub fn fill(&mut self, value: T) {
        for buffer in self.buffers.iter_mut() {
            buffer.fill(value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_roundtrip_column_pos() {
        let dims = Int2::new(3, 5);
        for i in 0..15 {
            assert_eq!(address2(column_pos(i, dims), dims), i);
        }
    }

    #[test]
    fn test_project_same_resolution_is_identity() {
        let scale = hidden_to_visible(Int3::new(4, 4, 2), Int3::new(4, 4, 8));
        for x in 0..4 {
            for y in 0..4 {
                assert_eq!(project(Int2::new(x, y), scale), Int2::new(x, y));
            }
        }
    }

    #[test]
    fn test_project_downsamples() {
        let scale = hidden_to_visible(Int3::new(4, 4, 2), Int3::new(2, 2, 8));
        assert_eq!(project(Int2::new(0, 0), scale), Int2::new(0, 0));
        assert_eq!(project(Int2::new(1, 1), scale), Int2::new(0, 0));
        assert_eq!(project(Int2::new(2, 3), scale), Int2::new(1, 1));
    }

    #[test]
    fn test_double_buffer_swap() {
        let mut buf: DoubleBuffer<f32> = DoubleBuffer::new(3);
        buf.front_mut().copy_from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(buf.back(), &[0.0, 0.0, 0.0]);

        buf.swap();
        assert_eq!(buf.back(), &[1.0, 2.0, 3.0]);
        assert_eq!(buf.front(), &[0.0, 0.0, 0.0]);

        buf.front_mut()[0] = 7.0;
        let (front, back) = buf.split();
        assert_eq!(front[0], 7.0);
        assert_eq!(back[0], 1.0);

        buf.fill(0.0);
        assert!(buf.front().iter().chain(buf.back()).all(|&v| v == 0.0));
    }
}
