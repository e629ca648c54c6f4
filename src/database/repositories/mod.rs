pub mod agendamento;
pub mod bloqueio;
pub mod setor;
pub mod turno;

// Re-export all repositories for easy importing
pub use agendamento::AgendamentoRepository;
pub use bloqueio::BloqueioRepository;
pub use setor::SetorRepository;
pub use turno::TurnoRepository;
