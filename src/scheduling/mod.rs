//! Pure scheduling logic: recurrence expansion, slot generation, blackout
//! overlay and availability composition. No I/O happens here; the services
//! layer feeds these functions with repository data.

pub mod bloqueio;
pub mod disponibilidade;
pub mod recorrencia;
pub mod slots;
pub mod validacao;

pub use disponibilidade::{DiaDisponibilidade, SetorDisponibilidade, SlotDisponibilidade};
pub use slots::Slot;
