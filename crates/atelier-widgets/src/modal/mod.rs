#![forbid(unsafe_code)]

//! Modal layer: container, form modal, and the stack that owns them.

pub mod container;
pub mod form;
pub mod stack;

pub use container::{
    BackdropConfig, MODAL_HIT_BACKDROP, MODAL_HIT_CONTENT, Modal, ModalAction, ModalConfig,
    ModalPosition, ModalState, ModalWidth,
};
pub use form::{
    Control, FORM_HIT_CANCEL, FORM_HIT_FIELD, FORM_HIT_SUBMIT, FormAction, FormField, FormFocus,
    FormModal, FormModalEntry, FormModalState, PayloadFn, ValidateFn,
};
pub use stack::{ModalId, ModalOutcome, ModalStack, StackEvent, StackModal, StackResult};
