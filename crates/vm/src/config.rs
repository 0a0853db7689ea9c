//! Machine configuration.

/// Default operand stack capacity, in slots.
pub const MAX_STACK_SIZE: usize = 2048;

/// Settings fixed for the lifetime of one machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmConfig {
    /// Number of stack slots. Exceeding it is a fatal stack overflow; the
    /// stack is never resized.
    pub stack_capacity: usize,
}

impl VmConfig {
    /// Config with a custom stack capacity.
    pub fn with_stack_capacity(stack_capacity: usize) -> Self {
        Self { stack_capacity }
    }
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            stack_capacity: MAX_STACK_SIZE,
        }
    }
}
