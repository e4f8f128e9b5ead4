use core::fmt;

/// Execution context in which a piece of single-source code runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    /// The sequential host thread of control.
    Host,
    /// One thread of a grid dispatched on the device.
    Device,
}

/// The execution context handed to every kernel invocation.
///
/// On the host, a [`Thread`] describes a single-thread, single-block grid
/// so that the same indexing code degenerates to a sequential scan.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Thread {
    location: Location,
    idx: Idx3,
    block: ThreadBlock,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ThreadBlock {
    idx: Idx3,
    dim: Dim3,
    grid: ThreadBlockGrid,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ThreadBlockGrid {
    dim: Dim3,
}

impl Thread {
    /// The execution context of sequential host code.
    #[must_use]
    #[expect(clippy::inline_always)]
    #[inline(always)]
    pub const fn host() -> Self {
        Self {
            location: Location::Host,
            idx: Idx3::ZERO,
            block: ThreadBlock {
                idx: Idx3::ZERO,
                dim: Dim3::ONE,
                grid: ThreadBlockGrid { dim: Dim3::ONE },
            },
        }
    }

    /// The execution context of the device thread `idx` inside block
    /// `block_idx` of a `grid_dim`-shaped grid of `block_dim`-shaped blocks.
    ///
    /// Runtimes construct these when dispatching a grid.
    #[must_use]
    pub const fn device(idx: Idx3, block_idx: Idx3, block_dim: Dim3, grid_dim: Dim3) -> Self {
        Self {
            location: Location::Device,
            idx,
            block: ThreadBlock {
                idx: block_idx,
                dim: block_dim,
                grid: ThreadBlockGrid { dim: grid_dim },
            },
        }
    }

    #[must_use]
    #[expect(clippy::inline_always)]
    #[inline(always)]
    pub const fn location(&self) -> Location {
        self.location
    }

    /// Flattened index of this thread across the whole grid.
    #[must_use]
    #[expect(clippy::inline_always)]
    #[inline(always)]
    pub const fn index(&self) -> usize {
        let block = self.block();
        let grid = block.grid();

        let block_id = block.idx().as_id(&grid.dim());
        let thread_id = self.idx().as_id(&block.dim());

        block_id * block.dim().size() + thread_id
    }

    #[must_use]
    #[expect(clippy::inline_always)]
    #[inline(always)]
    pub const fn idx(&self) -> Idx3 {
        self.idx
    }

    #[must_use]
    #[expect(clippy::inline_always)]
    #[inline(always)]
    pub const fn block(&self) -> ThreadBlock {
        self.block
    }
}

impl ThreadBlock {
    #[must_use]
    #[expect(clippy::inline_always)]
    #[inline(always)]
    pub const fn dim(&self) -> Dim3 {
        self.dim
    }

    #[must_use]
    #[expect(clippy::inline_always)]
    #[inline(always)]
    pub const fn idx(&self) -> Idx3 {
        self.idx
    }

    #[must_use]
    #[expect(clippy::inline_always)]
    #[inline(always)]
    pub const fn grid(&self) -> ThreadBlockGrid {
        self.grid
    }
}

impl ThreadBlockGrid {
    #[must_use]
    #[expect(clippy::inline_always)]
    #[inline(always)]
    pub const fn dim(&self) -> Dim3 {
        self.dim
    }
}

/// Dimension specified in kernel launching
///
/// [`Dim3::size`] saturates at [`usize::MAX`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Dim3 {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

/// Indices that the kernel code is running on
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Idx3 {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Dim3 {
    pub const ONE: Self = Self::linear(1);

    /// A one-dimensional shape of `x` elements.
    #[must_use]
    pub const fn linear(x: u32) -> Self {
        Self { x, y: 1, z: 1 }
    }

    #[must_use]
    #[expect(clippy::inline_always)]
    #[inline(always)]
    pub const fn size(&self) -> usize {
        (self.x as usize)
            .saturating_mul(self.y as usize)
            .saturating_mul(self.z as usize)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x == 0 || self.y == 0 || self.z == 0
    }
}

impl fmt::Display for Dim3 {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}x{}x{}", self.x, self.y, self.z)
    }
}

impl From<u32> for Dim3 {
    fn from(x: u32) -> Self {
        Self::linear(x)
    }
}

impl From<(u32, u32)> for Dim3 {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y, z: 1 }
    }
}

impl From<(u32, u32, u32)> for Dim3 {
    fn from((x, y, z): (u32, u32, u32)) -> Self {
        Self { x, y, z }
    }
}

impl Idx3 {
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };

    #[must_use]
    #[expect(clippy::inline_always)]
    #[inline(always)]
    pub const fn as_id(&self, dim: &Dim3) -> usize {
        (self.x as usize)
            + (self.y as usize) * (dim.x as usize)
            + (self.z as usize) * (dim.x as usize) * (dim.y as usize)
    }

    /// Inverse of [`Idx3::as_id`], `dim` must not be empty.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub const fn from_id(id: usize, dim: &Dim3) -> Self {
        let (x, y) = (dim.x as usize, dim.y as usize);

        Self {
            x: (id % x) as u32,
            y: ((id / x) % y) as u32,
            z: (id / (x * y)) as u32,
        }
    }
}

impl fmt::Display for Idx3 {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "({}, {}, {})", self.x, self.y, self.z)
    }
}
