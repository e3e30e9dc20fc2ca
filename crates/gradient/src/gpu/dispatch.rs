/// Workgroup dimensions the bundled kernels are compiled with.
pub const DEFAULT_WORKGROUP: (u32, u32) = (8, 8);

/// Workgroup counts for one compute dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSize {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl DispatchSize {
    /// Smallest grid of `workgroup`-sized groups that covers every pixel of a
    /// `width` x `height` surface. Degenerate sizes still dispatch one group.
    pub fn for_surface(width: u32, height: u32, workgroup: (u32, u32)) -> Self {
        let (group_w, group_h) = (workgroup.0.max(1), workgroup.1.max(1));
        Self {
            x: width.max(1).div_ceil(group_w),
            y: height.max(1).div_ceil(group_h),
            z: 1,
        }
    }

    #[inline]
    pub fn as_tuple(self) -> (u32, u32, u32) {
        (self.x, self.y, self.z)
    }
}
