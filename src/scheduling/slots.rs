use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::AgendaError;

/// One fixed 1-hour bookable subdivision of a turno, half-open `[inicio, fim)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub inicio: NaiveTime,
    pub fim: NaiveTime,
}

pub fn hora_alinhada(t: NaiveTime) -> bool {
    t.minute() == 0 && t.second() == 0 && t.nanosecond() == 0
}

/// Subdivides `[inicio, fim)` into contiguous 1-hour slots. Windows that are
/// not hour-aligned are rejected instead of silently truncated; turno
/// validation is supposed to keep them out of the store in the first place.
pub fn gerar_slots(inicio: NaiveTime, fim: NaiveTime) -> Result<Vec<Slot>, AgendaError> {
    if !hora_alinhada(inicio) || !hora_alinhada(fim) {
        return Err(AgendaError::TurnoMalformado(format!(
            "horários devem estar alinhados à hora cheia ({} - {})",
            inicio.format("%H:%M"),
            fim.format("%H:%M")
        )));
    }
    if fim <= inicio {
        return Err(AgendaError::TurnoMalformado(
            "hora_fim deve ser posterior a hora_inicio".to_string(),
        ));
    }

    let horas = (fim - inicio).num_hours();
    if !(1..=12).contains(&horas) {
        return Err(AgendaError::TurnoMalformado(format!(
            "duração de {} horas fora do intervalo permitido (1 a 12)",
            horas
        )));
    }

    let mut slots = Vec::with_capacity(horas as usize);
    let mut atual = inicio;
    while atual < fim {
        let proximo = atual + chrono::Duration::hours(1);
        slots.push(Slot {
            inicio: atual,
            fim: proximo,
        });
        atual = proximo;
    }
    Ok(slots)
}
