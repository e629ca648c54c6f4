pub mod agendamento;
pub mod disponibilidade;
pub mod user_context;

pub use agendamento::AgendamentoService;
pub use disponibilidade::DisponibilidadeService;
pub use user_context::{Papel, UserContext};
