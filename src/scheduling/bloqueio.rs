use chrono::{NaiveDate, NaiveTime};

use crate::database::models::Bloqueio;
use crate::scheduling::validacao::sobrepoe;

/// Whether a single bloqueio suppresses the requested date/time/setor.
///
/// Scope: a bloqueio without setor applies to every setor; a setor-scoped one
/// only to that exact setor. A request without setor (`None`) is an
/// organization-wide question and only matches organization-wide bloqueios.
/// Time: whole-day bloqueios match any time; a time-ranged bloqueio matches a
/// whole-day request, or a time-ranged request with half-open overlap.
fn bloqueia(
    bloqueio: &Bloqueio,
    data: NaiveDate,
    horario: Option<(NaiveTime, NaiveTime)>,
    setor: Option<&str>,
) -> bool {
    if !bloqueio.ativo {
        return false;
    }
    if data < bloqueio.data_inicio || data > bloqueio.data_fim {
        return false;
    }

    match (&bloqueio.setor, setor) {
        (None, _) => {}
        (Some(escopo), Some(pedido)) if escopo == pedido => {}
        _ => return false,
    }

    if bloqueio.dia_inteiro {
        return true;
    }
    let (b_inicio, b_fim) = match (bloqueio.hora_inicio, bloqueio.hora_fim) {
        (Some(inicio), Some(fim)) => (inicio, fim),
        // Malformed row; treat as whole-day rather than silently bookable
        _ => return true,
    };
    match horario {
        Some((inicio, fim)) => sobrepoe(inicio, fim, b_inicio, b_fim),
        None => true,
    }
}

/// First active bloqueio covering the request, if any. Returning the match
/// lets callers build a meaningful rejection message.
pub fn encontrar_bloqueio<'a>(
    bloqueios: &'a [Bloqueio],
    data: NaiveDate,
    horario: Option<(NaiveTime, NaiveTime)>,
    setor: Option<&str>,
) -> Option<&'a Bloqueio> {
    bloqueios.iter().find(|b| bloqueia(b, data, horario, setor))
}

pub fn esta_bloqueado(
    bloqueios: &[Bloqueio],
    data: NaiveDate,
    horario: Option<(NaiveTime, NaiveTime)>,
    setor: Option<&str>,
) -> bool {
    encontrar_bloqueio(bloqueios, data, horario, setor).is_some()
}
