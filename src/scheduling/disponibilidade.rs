use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{Bloqueio, Turno};
use crate::scheduling::bloqueio::esta_bloqueado;
use crate::scheduling::recorrencia::turno_ativo_em;
use crate::scheduling::slots::gerar_slots;

/// Confirmed-booking counts keyed by (turno, data, setor), as produced by a
/// grouped query over the booking store.
pub type VagasOcupadas = HashMap<(Uuid, NaiveDate, String), i64>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaDisponibilidade {
    pub data: NaiveDate,
    pub slots: Vec<SlotDisponibilidade>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDisponibilidade {
    pub inicio: NaiveTime,
    pub fim: NaiveTime,
    /// Per-setor capacity breakdown, merged across every turno offering
    /// this slot on this date.
    pub setores: BTreeMap<String, SetorDisponibilidade>,
    /// Organization-wide bloqueio covering this slot.
    pub bloqueado: bool,
    /// True when at least one setor still has capacity and is not suppressed.
    pub disponivel: bool,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SetorDisponibilidade {
    pub vagas_total: i64,
    pub vagas_ocupadas: i64,
    pub vagas_restantes: i64,
    pub bloqueado: bool,
}

/// Composes recurrence, slots, bloqueios and occupancy into the per-day view
/// the calendar consumes. Overlapping turnos on the same date merge into one
/// combined per-slot entry; capacities in the same slot/setor add up.
pub fn montar_disponibilidade(
    turnos: &[Turno],
    bloqueios: &[Bloqueio],
    ocupadas: &VagasOcupadas,
    setor_filtro: Option<&str>,
    inicio: NaiveDate,
    fim: NaiveDate,
) -> Vec<DiaDisponibilidade> {
    let mut dias = Vec::new();
    let mut data = inicio;
    while data <= fim {
        let mut por_slot: BTreeMap<NaiveTime, SlotDisponibilidade> = BTreeMap::new();

        for turno in turnos.iter().filter(|t| t.ativo) {
            if !turno_ativo_em(turno, data) {
                continue;
            }
            let slots = match gerar_slots(turno.hora_inicio, turno.hora_fim) {
                Ok(slots) => slots,
                Err(e) => {
                    log::warn!("Turno {} malformado, ignorado na agenda: {}", turno.id, e);
                    continue;
                }
            };

            for slot in slots {
                let entrada = por_slot.entry(slot.inicio).or_insert_with(|| {
                    SlotDisponibilidade {
                        inicio: slot.inicio,
                        fim: slot.fim,
                        setores: BTreeMap::new(),
                        bloqueado: esta_bloqueado(
                            bloqueios,
                            data,
                            Some((slot.inicio, slot.fim)),
                            None,
                        ),
                        disponivel: false,
                    }
                });

                for vagas_setor in &turno.setores {
                    if let Some(filtro) = setor_filtro {
                        if vagas_setor.setor != filtro {
                            continue;
                        }
                    }
                    let ocupado = ocupadas
                        .get(&(turno.id, data, vagas_setor.setor.clone()))
                        .copied()
                        .unwrap_or(0);
                    let restante = (i64::from(vagas_setor.vagas) - ocupado).max(0);

                    let setor = entrada
                        .setores
                        .entry(vagas_setor.setor.clone())
                        .or_insert_with(|| SetorDisponibilidade {
                            bloqueado: esta_bloqueado(
                                bloqueios,
                                data,
                                Some((slot.inicio, slot.fim)),
                                Some(&vagas_setor.setor),
                            ),
                            ..Default::default()
                        });
                    setor.vagas_total += i64::from(vagas_setor.vagas);
                    setor.vagas_ocupadas += ocupado;
                    setor.vagas_restantes += restante;
                }
            }
        }

        if !por_slot.is_empty() {
            let slots = por_slot
                .into_values()
                .map(|mut slot| {
                    slot.disponivel = slot
                        .setores
                        .values()
                        .any(|s| !s.bloqueado && s.vagas_restantes > 0);
                    slot
                })
                .collect();
            dias.push(DiaDisponibilidade { data, slots });
        }

        match data.succ_opt() {
            Some(proxima) => data = proxima,
            None => break,
        }
    }
    dias
}
