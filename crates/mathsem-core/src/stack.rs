//! Accumulation stack for children computed during a walk.
//!
//! The walker's descend call returns nothing, so a construction point opens
//! a frame before descending, every child appends its result to the top
//! frame, and the construction point closes the frame to receive its
//! children in document order.
//!
//! The stack is created with one bottom frame that is never closed; after a
//! complete traversal it holds the semantic root.

use tracing::trace;

use crate::error::TransformError;
use crate::semantic::SemanticNode;

/// Children collected so far for one construction point.
pub type Frame = Vec<SemanticNode>;

/// Stack of frames, top is the most recently opened.
#[derive(Debug)]
pub struct AccumulationStack {
    frames: Vec<Frame>,
}

impl Default for AccumulationStack {
    fn default() -> Self {
        Self::new()
    }
}

impl AccumulationStack {
    /// Create a stack holding only the bottom frame.
    pub fn new() -> Self {
        AccumulationStack {
            frames: vec![Frame::new()],
        }
    }

    /// Push an empty frame.
    pub fn open_frame(&mut self) {
        self.frames.push(Frame::new());
        trace!(depth = self.frames.len(), "open frame");
    }

    /// Append a node to the top frame.
    pub fn append(&mut self, node: SemanticNode) -> Result<(), TransformError> {
        let top = self
            .frames
            .last_mut()
            .ok_or(TransformError::FrameUnderflow)?;
        top.push(node);
        Ok(())
    }

    /// Pop the top frame and return its contents.
    ///
    /// The bottom frame cannot be closed this way.
    pub fn close_frame(&mut self) -> Result<Frame, TransformError> {
        if self.frames.len() <= 1 {
            return Err(TransformError::FrameUnderflow);
        }
        let frame = self.frames.pop().ok_or(TransformError::FrameUnderflow)?;
        trace!(depth = self.frames.len(), children = frame.len(), "close frame");
        Ok(frame)
    }

    /// Number of open frames, bottom frame included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Number of nodes in the top frame.
    pub fn pending(&self) -> usize {
        self.frames.last().map_or(0, Vec::len)
    }

    /// Consume the stack, returning the bottom frame.
    ///
    /// Fails unless the bottom frame is the only one left.
    pub fn into_root_frame(mut self) -> Result<Frame, TransformError> {
        if self.frames.len() != 1 {
            return Err(TransformError::UnbalancedFrames {
                depth: self.frames.len(),
            });
        }
        self.frames.pop().ok_or(TransformError::FrameUnderflow)
    }
}
