pub mod agendamento;
pub mod bloqueio;
pub mod setor;
pub mod turno;

pub use agendamento::{
    Agendamento, AgendamentoFilters, AgendamentoInput, ReagendamentoInput, StatusAgendamento,
};
pub use bloqueio::{Bloqueio, BloqueioInput, MotivoBloqueio};
pub use setor::Setor;
pub use turno::{TipoRecorrencia, Turno, TurnoInput, VagasSetor};
