use crate::codec::PixelFormat;

pub type FillResult = Result<(), FillError>;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillError {
    /// Only returned when the accelerated path was explicitly requested.
    #[error("accelerated fill not applicable: {0}")]
    Unsupported(#[from] Ineligible),

    #[error(transparent)]
    Kernel(#[from] KernelError),
}

/// Why a fill can't take the accelerated path.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligible {
    #[error("no accelerator available")]
    NoAccelerator,

    #[error("{accelerator} has no kernel for {format:?}")]
    Format {
        accelerator: &'static str,
        format: PixelFormat,
    },

    #[error("{accelerator} needs a width of at least {min_width}, got {width}")]
    Width {
        accelerator: &'static str,
        width: usize,
        min_width: usize,
    },
}

/// A failure status reported by an accelerated kernel.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{backend} kernel failed with status {status}")]
pub struct KernelError {
    pub backend: &'static str,
    pub status: i32,
}

impl KernelError {
    pub fn new(backend: &'static str, status: i32) -> Self {
        Self { backend, status }
    }
}
