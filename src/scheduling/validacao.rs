use chrono::NaiveTime;

use crate::database::models::{BloqueioInput, TipoRecorrencia, TurnoInput};
use crate::error::AgendaError;
use crate::scheduling::slots;

/// Maximum span, in days, of a custom recurrence date range.
pub const MAX_DIAS_RECORRENCIA_CUSTOM: i64 = 30;

/// Half-open interval overlap, consistent with slot boundaries: `[a1, a2)`
/// touches `[b1, b2)` only when they share at least one instant.
pub fn sobrepoe(a_inicio: NaiveTime, a_fim: NaiveTime, b_inicio: NaiveTime, b_fim: NaiveTime) -> bool {
    a_inicio < b_fim && b_inicio < a_fim
}

/// Validates a turno template against the structural invariants: hour-aligned
/// 1-12h window inside the operating window, positive per-setor capacity, and
/// a bounded weekday set for custom recurrence. Surfaced at creation/update
/// time so booking never sees a malformed turno.
pub fn validar_turno(
    input: &TurnoInput,
    abertura: NaiveTime,
    fechamento: NaiveTime,
) -> Result<(), AgendaError> {
    // Alignment, ordering and duration bounds
    slots::gerar_slots(input.hora_inicio, input.hora_fim)?;

    if input.hora_inicio < abertura || input.hora_fim > fechamento {
        return Err(AgendaError::TurnoMalformado(format!(
            "turno deve estar dentro da janela operacional {} - {}",
            abertura.format("%H:%M"),
            fechamento.format("%H:%M")
        )));
    }

    if input.setores.is_empty() {
        return Err(AgendaError::TurnoMalformado(
            "turno precisa de pelo menos um setor elegível".to_string(),
        ));
    }
    for vagas_setor in &input.setores {
        if !(1..=10).contains(&vagas_setor.vagas) {
            return Err(AgendaError::TurnoMalformado(format!(
                "vagas do setor {} devem estar entre 1 e 10",
                vagas_setor.setor
            )));
        }
    }

    if input.tipo_recorrencia == TipoRecorrencia::Custom {
        let dias = input.dias_semana.as_deref().unwrap_or_default();
        if dias.is_empty() {
            return Err(AgendaError::TurnoMalformado(
                "recorrência custom exige um conjunto de dias da semana".to_string(),
            ));
        }
        if dias.iter().any(|d| !(0..=6).contains(d)) {
            return Err(AgendaError::TurnoMalformado(
                "dias da semana devem estar entre 0 (domingo) e 6 (sábado)".to_string(),
            ));
        }
        let (inicio, fim) = match (input.data_inicio, input.data_fim) {
            (Some(inicio), Some(fim)) => (inicio, fim),
            _ => {
                return Err(AgendaError::TurnoMalformado(
                    "recorrência custom exige data_inicio e data_fim".to_string(),
                ));
            }
        };
        if fim < inicio {
            return Err(AgendaError::TurnoMalformado(
                "data_fim anterior a data_inicio".to_string(),
            ));
        }
        if (fim - inicio).num_days() > MAX_DIAS_RECORRENCIA_CUSTOM {
            return Err(AgendaError::TurnoMalformado(format!(
                "recorrência custom limitada a {} dias",
                MAX_DIAS_RECORRENCIA_CUSTOM
            )));
        }
    }

    Ok(())
}

/// Validates a bloqueio window: ordered date range, and an ordered
/// time-of-day range whenever it is not a whole-day suppression.
pub fn validar_bloqueio(input: &BloqueioInput) -> Result<(), AgendaError> {
    if input.data_fim < input.data_inicio {
        return Err(AgendaError::TurnoMalformado(
            "data_fim do bloqueio anterior a data_inicio".to_string(),
        ));
    }
    if !input.dia_inteiro {
        match (input.hora_inicio, input.hora_fim) {
            (Some(inicio), Some(fim)) if fim > inicio => {}
            _ => {
                return Err(AgendaError::TurnoMalformado(
                    "bloqueio parcial exige hora_inicio e hora_fim ordenados".to_string(),
                ));
            }
        }
    }
    Ok(())
}
