use crate::theme::{SubdirKind, Subdirectory};

/// Whether `subdir` serves `size`@`scale` without rescaling.
pub fn matches_exactly(subdir: &Subdirectory, size: u32, scale: u32) -> bool {
    if subdir.scale != scale {
        return false;
    }
    match subdir.kind {
        Some(SubdirKind::Fixed) => subdir.size == size,
        Some(SubdirKind::Scalable) => (subdir.min_size..=subdir.max_size).contains(&size),
        None => false,
    }
}

/// Pixel distance between `subdir` and the requested dimension
/// (`size * scale`). Subdirectories without a kind are `u64::MAX` away.
pub fn distance(subdir: &Subdirectory, size: u32, scale: u32) -> u64 {
    let dimension = u64::from(size) * u64::from(scale);
    let subdir_scale = u64::from(subdir.scale);
    match subdir.kind {
        Some(SubdirKind::Fixed) => (u64::from(subdir.size) * subdir_scale).abs_diff(dimension),
        Some(SubdirKind::Scalable) => {
            let min = u64::from(subdir.min_size) * subdir_scale;
            let max = u64::from(subdir.max_size) * subdir_scale;
            if dimension < min {
                min - dimension
            } else if dimension > max {
                dimension - max
            } else {
                0
            }
        }
        None => u64::MAX,
    }
}
