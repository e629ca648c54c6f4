pub mod agendamentos;
pub mod bloqueios;
pub mod disponibilidade;
pub mod setores;
pub mod shared;
pub mod turnos;
