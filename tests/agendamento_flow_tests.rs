// Booking flow tests against a real PostgreSQL database. Ignored by default;
// run with `cargo test -- --ignored` after pointing TEST_DATABASE_URL at a
// disposable database.

use chrono::NaiveDate;
use futures::future::join_all;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use calendario_be::database::models::{
    AgendamentoInput, BloqueioInput, MotivoBloqueio, ReagendamentoInput, StatusAgendamento,
};
use calendario_be::database::repositories::{
    AgendamentoRepository, BloqueioRepository, TurnoRepository,
};
use calendario_be::error::{AgendaError, AppError};

mod common;

// 2025-07-01 is a Tuesday; uteis recurrence covers it.
fn terca() -> NaiveDate {
    common::d(2025, 7, 1)
}

fn input(turno_id: Uuid, data: NaiveDate, hora: u32, setor: &str) -> AgendamentoInput {
    AgendamentoInput {
        turno_id,
        data,
        horario_inicio: common::h(hora),
        setor: setor.to_string(),
        categoria: "visita".to_string(),
    }
}

fn assert_agenda_err(result: Result<impl std::fmt::Debug, AppError>, expected: AgendaError) {
    match result {
        Err(AppError::Agenda(err)) => assert_eq!(err, expected),
        other => panic!("expected {:?}, got {:?}", expected, other),
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL)"]
async fn capacidade_esgotada_rejeita_segunda_reserva() {
    let pool = common::test_pool().await.unwrap();
    let setor = common::seed_setor(&pool, "assessoria").await.unwrap();
    let turnos = TurnoRepository::new(pool.clone());
    let service = common::agendamento_service(&pool);

    let turno = turnos
        .create_turno(common::turno_input(9, 11, vec![(&setor, 1)]), None)
        .await
        .unwrap();

    let primeiro = service
        .criar(input(turno.id, terca(), 9, &setor), Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(primeiro.status, StatusAgendamento::Confirmado);

    let segundo = service
        .criar(input(turno.id, terca(), 9, &setor), Uuid::new_v4())
        .await;
    assert_agenda_err(segundo, AgendaError::SemVagas);

    let agendamentos = AgendamentoRepository::new(pool.clone());
    assert_eq!(
        agendamentos
            .count_confirmados(turno.id, terca(), &setor)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL)"]
async fn reservas_concorrentes_nunca_excedem_a_capacidade() {
    let pool = common::test_pool().await.unwrap();
    let setor = common::seed_setor(&pool, "engenharia").await.unwrap();
    let turnos = TurnoRepository::new(pool.clone());
    let service = common::agendamento_service(&pool);

    let turno = turnos
        .create_turno(common::turno_input(9, 11, vec![(&setor, 2)]), None)
        .await
        .unwrap();

    let tentativas = (0..3).map(|_| {
        let service = service.clone();
        let setor = setor.clone();
        let turno_id = turno.id;
        async move {
            service
                .criar(input(turno_id, terca(), 9, &setor), Uuid::new_v4())
                .await
        }
    });
    let resultados = join_all(tentativas).await;

    let sucessos = resultados.iter().filter(|r| r.is_ok()).count();
    assert_eq!(sucessos, 2, "exactly the capacity must be granted");

    let agendamentos = AgendamentoRepository::new(pool.clone());
    assert_eq!(
        agendamentos
            .count_confirmados(turno.id, terca(), &setor)
            .await
            .unwrap(),
        2
    );
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL)"]
async fn bloqueio_impede_agendamento_no_setor() {
    let pool = common::test_pool().await.unwrap();
    let setor = common::seed_setor(&pool, "assessoria").await.unwrap();
    let turnos = TurnoRepository::new(pool.clone());
    let bloqueios = BloqueioRepository::new(pool.clone());
    let service = common::agendamento_service(&pool);

    let turno = turnos
        .create_turno(common::turno_input(9, 11, vec![(&setor, 1)]), None)
        .await
        .unwrap();

    // Scoped to this test's unique setor so parallel tests on the shared
    // database are unaffected.
    let data = common::d(2025, 9, 2);
    bloqueios
        .create_bloqueio(
            BloqueioInput {
                data_inicio: data,
                data_fim: data,
                dia_inteiro: true,
                hora_inicio: None,
                hora_fim: None,
                setor: Some(setor.clone()),
                motivo: MotivoBloqueio::Feriado,
                descricao: None,
            },
            None,
        )
        .await
        .unwrap();

    let resultado = service
        .criar(input(turno.id, data, 9, &setor), Uuid::new_v4())
        .await;
    assert_agenda_err(resultado, AgendaError::Bloqueado("feriado".to_string()));

    // Other dates of the same turno remain bookable
    service
        .criar(input(turno.id, terca(), 9, &setor), Uuid::new_v4())
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL)"]
async fn validacao_rejeita_slot_setor_e_data_invalidos() {
    let pool = common::test_pool().await.unwrap();
    let setor = common::seed_setor(&pool, "assessoria").await.unwrap();
    let turnos = TurnoRepository::new(pool.clone());
    let service = common::agendamento_service(&pool);

    let turno = turnos
        .create_turno(common::turno_input(9, 11, vec![(&setor, 1)]), None)
        .await
        .unwrap();

    // Slot boundary that the turno never generates
    let resultado = service
        .criar(input(turno.id, terca(), 12, &setor), Uuid::new_v4())
        .await;
    assert_agenda_err(resultado, AgendaError::SlotInvalido("12:00".to_string()));

    // Setor outside the eligible set
    let resultado = service
        .criar(input(turno.id, terca(), 9, "financeiro"), Uuid::new_v4())
        .await;
    assert_agenda_err(
        resultado,
        AgendaError::SetorNaoElegivel("financeiro".to_string()),
    );

    // 2025-07-05 is a Saturday, outside uteis recurrence
    let sabado = common::d(2025, 7, 5);
    let resultado = service
        .criar(input(turno.id, sabado, 9, &setor), Uuid::new_v4())
        .await;
    assert_agenda_err(resultado, AgendaError::ForaDaRecorrencia(sabado.to_string()));
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL)"]
async fn cancelamento_libera_vaga_e_e_idempotente() {
    let pool = common::test_pool().await.unwrap();
    let setor = common::seed_setor(&pool, "assessoria").await.unwrap();
    let turnos = TurnoRepository::new(pool.clone());
    let agendamentos = AgendamentoRepository::new(pool.clone());
    let service = common::agendamento_service(&pool);

    let turno = turnos
        .create_turno(common::turno_input(9, 11, vec![(&setor, 1)]), None)
        .await
        .unwrap();
    let agendamento = service
        .criar(input(turno.id, terca(), 9, &setor), Uuid::new_v4())
        .await
        .unwrap();

    // Empty motivo is rejected before anything changes
    assert_agenda_err(
        service.cancelar(agendamento.id, "   ").await,
        AgendaError::MotivoObrigatorio,
    );

    let cancelado = service
        .cancelar(agendamento.id, "cliente desistiu")
        .await
        .unwrap();
    assert_eq!(cancelado.status, StatusAgendamento::Cancelado);
    assert_eq!(cancelado.cancelado_motivo.as_deref(), Some("cliente desistiu"));
    assert_eq!(
        agendamentos
            .count_confirmados(turno.id, terca(), &setor)
            .await
            .unwrap(),
        0
    );

    // Cancelling again must not change remaining capacity
    assert_agenda_err(
        service.cancelar(agendamento.id, "de novo").await,
        AgendaError::JaCancelado,
    );
    assert_eq!(
        agendamentos
            .count_confirmados(turno.id, terca(), &setor)
            .await
            .unwrap(),
        0
    );

    // Freed capacity is bookable again
    service
        .criar(input(turno.id, terca(), 9, &setor), Uuid::new_v4())
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL)"]
async fn reagendamento_move_a_reserva_sem_duplicar() {
    let pool = common::test_pool().await.unwrap();
    let setor = common::seed_setor(&pool, "assessoria").await.unwrap();
    let turnos = TurnoRepository::new(pool.clone());
    let agendamentos = AgendamentoRepository::new(pool.clone());
    let service = common::agendamento_service(&pool);

    let turno = turnos
        .create_turno(common::turno_input(9, 17, vec![(&setor, 1)]), None)
        .await
        .unwrap();
    let agendamento = service
        .criar(input(turno.id, terca(), 10, &setor), Uuid::new_v4())
        .await
        .unwrap();

    // Move to the next day: old key freed, new key consumed, same identifier
    let quarta = common::d(2025, 7, 2);
    let movido = service
        .reagendar(
            agendamento.id,
            ReagendamentoInput {
                turno_id: None,
                data: quarta,
                horario_inicio: common::h(14),
                setor: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(movido.id, agendamento.id);
    assert_eq!(movido.data, quarta);
    assert_eq!(movido.horario_inicio, common::h(14));
    assert_eq!(movido.horario_fim, common::h(15));
    assert_eq!(
        agendamentos
            .count_confirmados(turno.id, terca(), &setor)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        agendamentos
            .count_confirmados(turno.id, quarta, &setor)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL)"]
async fn reagendamento_para_alvo_lotado_mantem_reserva_original() {
    let pool = common::test_pool().await.unwrap();
    let setor = common::seed_setor(&pool, "assessoria").await.unwrap();
    let turnos = TurnoRepository::new(pool.clone());
    let agendamentos = AgendamentoRepository::new(pool.clone());
    let service = common::agendamento_service(&pool);

    let turno = turnos
        .create_turno(common::turno_input(9, 11, vec![(&setor, 1)]), None)
        .await
        .unwrap();

    let quarta = common::d(2025, 7, 2);
    let original = service
        .criar(input(turno.id, terca(), 9, &setor), Uuid::new_v4())
        .await
        .unwrap();
    // Fill the target day completely
    service
        .criar(input(turno.id, quarta, 9, &setor), Uuid::new_v4())
        .await
        .unwrap();

    let resultado = service
        .reagendar(
            original.id,
            ReagendamentoInput {
                turno_id: None,
                data: quarta,
                horario_inicio: common::h(10),
                setor: None,
            },
        )
        .await;
    assert_agenda_err(resultado, AgendaError::SemVagas);

    // Original booking untouched at its original slot
    let intacto = agendamentos.find_by_id(original.id).await.unwrap().unwrap();
    assert_eq!(intacto.status, StatusAgendamento::Confirmado);
    assert_eq!(intacto.data, terca());
    assert_eq!(intacto.horario_inicio, common::h(9));
}
