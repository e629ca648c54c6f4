use chrono::{Datelike, NaiveDate};

use crate::database::models::{TipoRecorrencia, Turno};

/// Whether the turno recurs on the given calendar date. Date-range bounds
/// apply to every recurrence kind when present; the weekday set only to
/// custom recurrence. Weekday numbering is 0=domingo..6=sábado.
pub fn turno_ativo_em(turno: &Turno, data: NaiveDate) -> bool {
    if let Some(inicio) = turno.data_inicio {
        if data < inicio {
            return false;
        }
    }
    if let Some(fim) = turno.data_fim {
        if data > fim {
            return false;
        }
    }

    let dia_semana = data.weekday().num_days_from_sunday() as i16;
    match turno.tipo_recorrencia {
        TipoRecorrencia::Todos => true,
        TipoRecorrencia::Uteis => (1..=5).contains(&dia_semana),
        TipoRecorrencia::Custom => turno
            .dias_semana
            .as_ref()
            .is_some_and(|dias| dias.contains(&dia_semana)),
    }
}

/// Expands the turno's recurrence over `[inicio, fim]` into the sorted set
/// of dates it is active on. An empty intersection yields an empty vec.
pub fn resolve_datas(turno: &Turno, inicio: NaiveDate, fim: NaiveDate) -> Vec<NaiveDate> {
    let mut datas = Vec::new();
    let mut atual = inicio;
    while atual <= fim {
        if turno_ativo_em(turno, atual) {
            datas.push(atual);
        }
        match atual.succ_opt() {
            Some(proxima) => atual = proxima,
            None => break,
        }
    }
    datas
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Utc, Weekday};
    use uuid::Uuid;

    use crate::database::models::VagasSetor;

    fn turno(tipo: TipoRecorrencia) -> Turno {
        let agora = Utc::now().naive_utc();
        Turno {
            id: Uuid::new_v4(),
            hora_inicio: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            hora_fim: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            tipo_recorrencia: tipo,
            data_inicio: None,
            data_fim: None,
            dias_semana: None,
            cor: "#3b82f6".to_string(),
            ativo: true,
            setores: vec![VagasSetor {
                setor: "assessoria".to_string(),
                vagas: 1,
            }],
            criado_por: None,
            criado_em: agora,
            atualizado_em: agora,
        }
    }

    fn d(ano: i32, mes: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(ano, mes, dia).unwrap()
    }

    #[test]
    fn todos_cobre_cada_dia_do_periodo() {
        let t = turno(TipoRecorrencia::Todos);
        let datas = resolve_datas(&t, d(2025, 3, 1), d(2025, 3, 31));
        assert_eq!(datas.len(), 31);
        assert_eq!(datas.first(), Some(&d(2025, 3, 1)));
        assert_eq!(datas.last(), Some(&d(2025, 3, 31)));
    }

    #[test]
    fn uteis_nunca_retorna_fim_de_semana() {
        let t = turno(TipoRecorrencia::Uteis);
        let datas = resolve_datas(&t, d(2025, 3, 1), d(2025, 3, 31));
        assert!(!datas.is_empty());
        for data in &datas {
            let dia = data.weekday();
            assert_ne!(dia, Weekday::Sat, "sábado em {}", data);
            assert_ne!(dia, Weekday::Sun, "domingo em {}", data);
        }
        // March 2025 has 21 weekdays
        assert_eq!(datas.len(), 21);
    }

    #[test]
    fn custom_intersecta_periodo_e_dias_da_semana() {
        let mut t = turno(TipoRecorrencia::Custom);
        t.data_inicio = Some(d(2025, 1, 1));
        t.data_fim = Some(d(2025, 1, 10));
        t.dias_semana = Some(vec![1]); // segunda-feira

        let datas = resolve_datas(&t, d(2025, 1, 1), d(2025, 1, 31));
        assert_eq!(datas, vec![d(2025, 1, 6)]);
    }

    #[test]
    fn custom_sem_dias_semana_nao_recorre() {
        let mut t = turno(TipoRecorrencia::Custom);
        t.data_inicio = Some(d(2025, 1, 1));
        t.data_fim = Some(d(2025, 1, 10));
        t.dias_semana = None;

        assert!(resolve_datas(&t, d(2025, 1, 1), d(2025, 1, 31)).is_empty());
    }

    #[test]
    fn limites_de_data_valem_para_qualquer_recorrencia() {
        let mut t = turno(TipoRecorrencia::Todos);
        t.data_inicio = Some(d(2025, 2, 10));
        t.data_fim = Some(d(2025, 2, 12));

        let datas = resolve_datas(&t, d(2025, 2, 1), d(2025, 2, 28));
        assert_eq!(datas, vec![d(2025, 2, 10), d(2025, 2, 11), d(2025, 2, 12)]);
    }

    #[test]
    fn intersecao_vazia_retorna_vazio_sem_erro() {
        let mut t = turno(TipoRecorrencia::Custom);
        t.data_inicio = Some(d(2025, 1, 1));
        t.data_fim = Some(d(2025, 1, 10));
        t.dias_semana = Some(vec![1]);

        assert!(resolve_datas(&t, d(2025, 6, 1), d(2025, 6, 30)).is_empty());
    }

    #[test]
    fn periodo_invertido_retorna_vazio() {
        let t = turno(TipoRecorrencia::Todos);
        assert!(resolve_datas(&t, d(2025, 3, 10), d(2025, 3, 1)).is_empty());
    }
}
