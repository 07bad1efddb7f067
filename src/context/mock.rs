//! MockContext - CPU-only GlContext for headless use and tests
//!
//! Tracks buffer allocations, the array-buffer binding, a program table,
//! enabled attribute slots, and every attribute-pointer call issued, all
//! inspectable from the outside. Upload failure can be injected to exercise
//! out-of-memory paths.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use super::{
    AttribLocation, AttribSize, BufferHandle, ContextError, DataType, GlContext, ProgramHandle,
    Usage,
};

/// Which attribute-pointer entry point a [`PointerCall`] went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerFamily {
    Float,
    Integer,
    Double,
}

/// One recorded attribute-pointer configuration call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerCall {
    pub family: PointerFamily,
    pub location: AttribLocation,
    pub size: AttribSize,
    pub ty: DataType,
    pub normalized: bool,
    pub stride: i32,
    pub offset: usize,
}

#[derive(Default)]
struct MockState {
    next_raw: u64,
    buffers: HashMap<BufferHandle, Vec<u8>>,
    bound: Option<BufferHandle>,
    programs: HashMap<ProgramHandle, HashMap<String, AttribLocation>>,
    current_program: Option<ProgramHandle>,
    enabled: BTreeSet<u32>,
    pointer_calls: Vec<PointerCall>,
    pending_error: Option<ContextError>,
    fail_next_upload: bool,
}

/// A CPU-only [`GlContext`].
///
/// Interior mutability keeps the trait's `&self` signatures; the cell makes
/// the type `!Sync`, matching the thread-bound contract of the real API.
#[derive(Default)]
pub struct MockContext {
    state: RefCell<MockState>,
}

impl MockContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a program whose attribute table maps `attributes[i]` to
    /// slot `i`.
    pub fn create_program(&self, attributes: &[&str]) -> ProgramHandle {
        let mut state = self.state.borrow_mut();
        state.next_raw += 1;
        let handle = ProgramHandle::from_raw(state.next_raw);
        let table = attributes
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), AttribLocation::from_index(i as u32)))
            .collect();
        state.programs.insert(handle, table);
        handle
    }

    /// Make `program` current, or clear the current program.
    pub fn use_program(&self, program: Option<ProgramHandle>) {
        self.state.borrow_mut().current_program = program;
    }

    /// Make the next `buffer_data` call fail with
    /// [`ContextError::OutOfMemory`].
    pub fn fail_next_upload(&self) {
        self.state.borrow_mut().fail_next_upload = true;
    }

    /// Number of buffer objects currently allocated.
    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    /// Whether `buffer` is still allocated.
    pub fn is_live(&self, buffer: BufferHandle) -> bool {
        self.state.borrow().buffers.contains_key(&buffer)
    }

    /// The bytes last uploaded into `buffer`, if it is allocated.
    pub fn buffer_contents(&self, buffer: BufferHandle) -> Option<Vec<u8>> {
        self.state.borrow().buffers.get(&buffer).cloned()
    }

    /// Indices of the currently enabled attribute slots, ascending.
    pub fn enabled_attribs(&self) -> Vec<u32> {
        self.state.borrow().enabled.iter().copied().collect()
    }

    /// Every attribute-pointer call issued so far, in order.
    pub fn pointer_calls(&self) -> Vec<PointerCall> {
        self.state.borrow().pointer_calls.clone()
    }
}

impl GlContext for MockContext {
    fn create_buffer(&self) -> BufferHandle {
        let mut state = self.state.borrow_mut();
        state.next_raw += 1;
        let handle = BufferHandle::from_raw(state.next_raw);
        state.buffers.insert(handle, Vec::new());
        handle
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        let mut state = self.state.borrow_mut();
        state.buffers.remove(&buffer);
        if state.bound == Some(buffer) {
            state.bound = None;
        }
    }

    fn bind_array_buffer(&self, buffer: Option<BufferHandle>) {
        let mut state = self.state.borrow_mut();
        debug_assert!(
            buffer.map_or(true, |b| state.buffers.contains_key(&b)),
            "binding a buffer that was never created"
        );
        state.bound = buffer;
    }

    fn array_buffer_binding(&self) -> Option<BufferHandle> {
        self.state.borrow().bound
    }

    fn buffer_data(&self, data: &[u8], _usage: Usage) {
        let mut state = self.state.borrow_mut();
        if state.fail_next_upload {
            state.fail_next_upload = false;
            state.pending_error = Some(ContextError::OutOfMemory);
            return;
        }
        match state.bound {
            Some(bound) => {
                if let Some(store) = state.buffers.get_mut(&bound) {
                    store.clear();
                    store.extend_from_slice(data);
                }
            }
            None => state.pending_error = Some(ContextError::InvalidOperation),
        }
    }

    fn take_error(&self) -> Option<ContextError> {
        self.state.borrow_mut().pending_error.take()
    }

    fn current_program(&self) -> Option<ProgramHandle> {
        self.state.borrow().current_program
    }

    fn attrib_location(&self, program: ProgramHandle, name: &str) -> Option<AttribLocation> {
        self.state
            .borrow()
            .programs
            .get(&program)
            .and_then(|table| table.get(name).copied())
    }

    fn max_vertex_attribs(&self) -> u32 {
        16
    }

    fn enable_vertex_attrib(&self, location: AttribLocation) {
        self.state.borrow_mut().enabled.insert(location.index());
    }

    fn disable_vertex_attrib(&self, location: AttribLocation) {
        self.state.borrow_mut().enabled.remove(&location.index());
    }

    fn vertex_attrib_pointer(
        &self,
        location: AttribLocation,
        size: AttribSize,
        ty: DataType,
        normalized: bool,
        stride: i32,
        offset: usize,
    ) {
        self.state.borrow_mut().pointer_calls.push(PointerCall {
            family: PointerFamily::Float,
            location,
            size,
            ty,
            normalized,
            stride,
            offset,
        });
    }

    fn vertex_attrib_i_pointer(
        &self,
        location: AttribLocation,
        size: AttribSize,
        ty: DataType,
        stride: i32,
        offset: usize,
    ) {
        self.state.borrow_mut().pointer_calls.push(PointerCall {
            family: PointerFamily::Integer,
            location,
            size,
            ty,
            normalized: false,
            stride,
            offset,
        });
    }

    fn vertex_attrib_l_pointer(
        &self,
        location: AttribLocation,
        size: AttribSize,
        stride: i32,
        offset: usize,
    ) {
        self.state.borrow_mut().pointer_calls.push(PointerCall {
            family: PointerFamily::Double,
            location,
            size,
            ty: DataType::Double,
            normalized: false,
            stride,
            offset,
        });
    }
}
