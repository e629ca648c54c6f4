use chrono::NaiveDate;

use crate::database::repositories::{
    AgendamentoRepository, BloqueioRepository, TurnoRepository,
};
use crate::error::AppError;
use crate::scheduling::disponibilidade::{DiaDisponibilidade, montar_disponibilidade};

/// Widest range the calendar may ask for in one request (two months of view).
const MAX_DIAS_CONSULTA: i64 = 62;

#[derive(Clone)]
pub struct DisponibilidadeService {
    turnos: TurnoRepository,
    agendamentos: AgendamentoRepository,
    bloqueios: BloqueioRepository,
}

impl DisponibilidadeService {
    pub fn new(
        turnos: TurnoRepository,
        agendamentos: AgendamentoRepository,
        bloqueios: BloqueioRepository,
    ) -> Self {
        Self {
            turnos,
            agendamentos,
            bloqueios,
        }
    }

    /// Per-day, per-slot availability for the calendar. Turno and bloqueio
    /// definitions may come from the short-lived cache; occupancy counts are
    /// always read from committed state.
    pub async fn build(
        &self,
        setor: Option<&str>,
        inicio: NaiveDate,
        fim: NaiveDate,
    ) -> Result<Vec<DiaDisponibilidade>, AppError> {
        if fim < inicio {
            return Err(AppError::BadRequest(
                "fim anterior a inicio".to_string(),
            ));
        }
        if (fim - inicio).num_days() > MAX_DIAS_CONSULTA {
            return Err(AppError::BadRequest(format!(
                "período limitado a {} dias",
                MAX_DIAS_CONSULTA
            )));
        }

        let turnos = self.turnos.list_ativos_cached().await.map_err(AppError::from)?;
        let bloqueios = self
            .bloqueios
            .find_ativos_no_periodo(inicio, fim)
            .await
            .map_err(AppError::from)?;
        let ocupadas = self
            .agendamentos
            .counts_no_periodo(inicio, fim)
            .await
            .map_err(AppError::from)?;

        Ok(montar_disponibilidade(
            &turnos, &bloqueios, &ocupadas, setor, inicio, fim,
        ))
    }
}
