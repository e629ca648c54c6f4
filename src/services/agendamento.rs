use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::database::models::{
    Agendamento, AgendamentoInput, ReagendamentoInput, StatusAgendamento, Turno,
};
use crate::database::repositories::{
    AgendamentoRepository, BloqueioRepository, TurnoRepository,
};
use crate::error::{AgendaError, AppError};
use crate::scheduling::bloqueio::encontrar_bloqueio;
use crate::scheduling::recorrencia::turno_ativo_em;
use crate::scheduling::slots::{Slot, gerar_slots};

/// Booking arbiter: runs the ordered validation pipeline and hands the final
/// capacity decision to the store's atomic reserve. Creation either fully
/// succeeds (booking persisted, capacity consumed) or fully fails.
#[derive(Clone)]
pub struct AgendamentoService {
    turnos: TurnoRepository,
    agendamentos: AgendamentoRepository,
    bloqueios: BloqueioRepository,
}

impl AgendamentoService {
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

    pub async fn criar(
        &self,
        input: AgendamentoInput,
        solicitante: Uuid,
    ) -> Result<Agendamento, AppError> {
        let (turno, slot, vagas) = self
            .validar_alvo(input.turno_id, input.data, input.horario_inicio, &input.setor)
            .await?;

        let agendamento = self
            .agendamentos
            .reserve(
                turno.id,
                input.data,
                slot.inicio,
                slot.fim,
                &input.setor,
                solicitante,
                &input.categoria,
                vagas,
            )
            .await
            .map_err(AppError::from)?
            .ok_or(AgendaError::SemVagas)?;

        log::info!(
            "Agendamento {} criado: turno {} em {} {} setor {}",
            agendamento.id,
            turno.id,
            input.data,
            slot.inicio.format("%H:%M"),
            input.setor
        );
        Ok(agendamento)
    }

    pub async fn cancelar(&self, id: Uuid, motivo: &str) -> Result<Agendamento, AppError> {
        if motivo.trim().is_empty() {
            return Err(AgendaError::MotivoObrigatorio.into());
        }

        let agendamento = self
            .agendamentos
            .find_by_id(id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound("Agendamento não encontrado".to_string()))?;

        if agendamento.status == StatusAgendamento::Cancelado {
            return Err(AgendaError::JaCancelado.into());
        }

        // The status guard in the store closes the race with a concurrent
        // cancellation of the same booking.
        self.agendamentos
            .cancel(id, motivo.trim())
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AgendaError::JaCancelado.into())
    }

    /// Moves a confirmed booking to a new slot. The target is validated
    /// exactly as in `criar` while the original slot is still held; a failure
    /// at any step leaves the booking unchanged.
    pub async fn reagendar(
        &self,
        id: Uuid,
        input: ReagendamentoInput,
    ) -> Result<Agendamento, AppError> {
        let agendamento = self
            .agendamentos
            .find_by_id(id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound("Agendamento não encontrado".to_string()))?;

        if agendamento.status == StatusAgendamento::Cancelado {
            return Err(AgendaError::JaCancelado.into());
        }

        let turno_id = input.turno_id.unwrap_or(agendamento.turno_id);
        let setor = input.setor.unwrap_or_else(|| agendamento.setor.clone());

        let (turno, slot, vagas) = self
            .validar_alvo(turno_id, input.data, input.horario_inicio, &setor)
            .await?;

        let movido = self
            .agendamentos
            .move_agendamento(id, turno.id, input.data, slot.inicio, slot.fim, &setor, vagas)
            .await
            .map_err(AppError::from)?
            .ok_or(AgendaError::SemVagas)?;

        log::info!(
            "Agendamento {} movido para turno {} em {} {}",
            id,
            turno.id,
            input.data,
            slot.inicio.format("%H:%M")
        );
        Ok(movido)
    }

    /// Ordered validation, first failing check wins: turno active, date in
    /// recurrence, slot aligned, setor eligible, no bloqueio. Capacity is
    /// decided afterwards by the atomic reserve, not here.
    async fn validar_alvo(
        &self,
        turno_id: Uuid,
        data: NaiveDate,
        horario_inicio: NaiveTime,
        setor: &str,
    ) -> Result<(Turno, Slot, i32), AppError> {
        let turno = self
            .turnos
            .find_by_id(turno_id)
            .await
            .map_err(AppError::from)?
            .filter(|t| t.ativo)
            .ok_or_else(|| AppError::NotFound("Turno não encontrado ou inativo".to_string()))?;

        if !turno_ativo_em(&turno, data) {
            return Err(AgendaError::ForaDaRecorrencia(data.to_string()).into());
        }

        let slots = gerar_slots(turno.hora_inicio, turno.hora_fim).map_err(AppError::from)?;
        let slot = slots
            .into_iter()
            .find(|s| s.inicio == horario_inicio)
            .ok_or_else(|| {
                AgendaError::SlotInvalido(format!("{}", horario_inicio.format("%H:%M")))
            })?;

        let vagas = turno
            .vagas_para(setor)
            .ok_or_else(|| AgendaError::SetorNaoElegivel(setor.to_string()))?;

        let bloqueios = self
            .bloqueios
            .find_ativos_no_periodo(data, data)
            .await
            .map_err(AppError::from)?;
        if let Some(bloqueio) =
            encontrar_bloqueio(&bloqueios, data, Some((slot.inicio, slot.fim)), Some(setor))
        {
            return Err(AgendaError::Bloqueado(bloqueio.motivo.to_string()).into());
        }

        Ok((turno, slot, vagas))
    }
}
