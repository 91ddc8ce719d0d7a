mod common;
use common::*;
use solar_client::prelude::*;

#[tokio::test]
async fn get_all_info_merges_by_property_id() {
    common_setup();

    let (mut coordinator, recorder, _) = Factory::coordinator(vec![Factory::connection(vec![
        Factory::info(vec![
            Factory::property(37, "fz_output", json!(1)),
            Factory::property(2, "cddl", json!(3.5)),
        ]),
        Factory::info(vec![
            Factory::property(35, "output_mode", json!(1)),
            Factory::property(1, "dianya", json!(12.8)),
        ]),
    ])]);

    assert!(coordinator.connect().await);
    let properties = coordinator.get_all_info().await;

    let ids: Vec<i64> = properties.iter().map(|p| p.property_id).collect();
    assert_eq!(ids, vec![1, 2, 35, 37]);
    assert_eq!(properties[0].unikey, "dianya");
    assert_eq!(recorder.sent_actions(), vec!["getMachinInfoOne", "getMachinInfoTwo"]);
}

#[tokio::test]
async fn get_all_info_without_data() {
    common_setup();

    let (mut coordinator, _, _) = Factory::coordinator(vec![Factory::connection(vec![
        Factory::reply(200),
        Factory::info(vec![Factory::property(5, "temperature", json!(25))]),
    ])]);

    assert!(coordinator.connect().await);
    let properties = coordinator.get_all_info().await;

    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].property_id, 5);
}

#[tokio::test]
async fn get_all_info_failure_is_empty() {
    common_setup();

    // second query never answered
    let (mut coordinator, recorder, _) = Factory::coordinator(vec![Factory::connection(vec![
        Factory::info(vec![Factory::property(1, "dianya", json!(12.8))]),
    ])]);

    assert!(coordinator.connect().await);
    assert!(coordinator.get_all_info().await.is_empty());
    assert!(!coordinator.session().is_connected());
    assert_eq!(recorder.sent().len(), 2);
}

#[tokio::test]
async fn get_formatted_info_empty() {
    common_setup();

    let (mut coordinator, _, _) = Factory::coordinator(vec![Factory::connection(vec![
        Factory::info(vec![]),
        Factory::reply(200),
    ])]);

    assert!(coordinator.connect().await);
    assert_eq!(coordinator.get_formatted_info().await, "No information available");
}

#[tokio::test]
async fn get_formatted_info_table() {
    common_setup();

    let definition = json!([{"title": "unit", "value": "C"}]).to_string();
    let (mut coordinator, _, _) = Factory::coordinator(vec![Factory::connection(vec![
        Factory::info(vec![json!({
            "property_id": 5,
            "unikey": "temperature",
            "value": 25,
            "definition": definition,
        })]),
        Factory::info(vec![]),
    ])]);

    assert!(coordinator.connect().await);
    let table = coordinator.get_formatted_info().await;

    assert!(table.starts_with('\n'));
    assert!(table.contains("ID   | Property Key         | Human Name"));
    assert!(table.contains(&format!(
        "   5 | {:<20} | {:<30} | {:<30} | {:<10}",
        "temperature", "Temperature", "25 °C", "25"
    )));
}

#[tokio::test]
async fn set_charge_mode_sends_property_35() {
    common_setup();

    let (mut coordinator, recorder, _) =
        Factory::coordinator(vec![Factory::connection(vec![Factory::reply(200)])]);

    assert!(coordinator.connect().await);
    assert!(coordinator.set_charge_mode(ChargeMode::Timing).await);

    assert_eq!(
        recorder.sent(),
        vec![json!({"Action": "setPropertyData", "id": 35, "value": 2, "mac": Factory::mac()})]
    );
}

#[tokio::test]
async fn set_charge_mode_rejected() {
    common_setup();

    let (mut coordinator, _, _) =
        Factory::coordinator(vec![Factory::connection(vec![Factory::reply(500)])]);

    assert!(coordinator.connect().await);
    assert!(!coordinator.set_charge_mode(ChargeMode::Auto).await);
}

#[tokio::test]
async fn get_charge_mode() {
    common_setup();

    let (mut coordinator, recorder, _) = Factory::coordinator(vec![Factory::connection(vec![
        Factory::info(vec![
            Factory::property(35, "output_mode", json!(1)),
            Factory::property(37, "fz_output", json!(0)),
        ]),
    ])]);

    assert!(coordinator.connect().await);
    assert_eq!(coordinator.get_charge_mode().await, Some(json!(1)));
    assert_eq!(recorder.sent_actions(), vec!["getMachinInfoTwo"]);
}

#[tokio::test]
async fn get_charge_mode_missing() {
    common_setup();

    let (mut coordinator, _, _) = Factory::coordinator(vec![Factory::connection(vec![
        Factory::info(vec![Factory::property(37, "fz_output", json!(0))]),
    ])]);

    assert!(coordinator.connect().await);
    assert_eq!(coordinator.get_charge_mode().await, None);
}

#[tokio::test]
async fn reported_null_is_not_missing() {
    common_setup();

    let (mut coordinator, _, _) = Factory::coordinator(vec![Factory::connection(vec![
        Factory::info(vec![Factory::property(37, "fz_output", Value::Null)]),
    ])]);

    assert!(coordinator.connect().await);
    assert_eq!(coordinator.get_load_state().await, Some(Value::Null));
}

#[tokio::test]
async fn get_load_state() {
    common_setup();

    let (mut coordinator, _, _) = Factory::coordinator(vec![Factory::connection(vec![
        Factory::info(vec![
            Factory::property(35, "output_mode", json!(1)),
            Factory::property(37, "fz_output", json!(1)),
        ]),
    ])]);

    assert!(coordinator.connect().await);
    assert_eq!(coordinator.get_load_state().await, Some(json!(1)));
}

#[tokio::test]
async fn get_machine_info() {
    common_setup();

    let (mut coordinator, _, _) = Factory::coordinator(vec![Factory::connection(vec![
        Factory::info(vec![Factory::property(35, "output_mode", json!(3))]),
    ])]);

    assert!(coordinator.connect().await);
    let response = coordinator.get_machine_info().await.unwrap();
    assert!(response.is_ok());
    assert_eq!(response.find_property(35).unwrap().unwrap().value, json!(3));
}

#[tokio::test]
async fn run_rejects_bad_commands_before_connecting() {
    common_setup();

    let (mut coordinator, recorder, _) =
        Factory::coordinator(vec![Factory::connection(vec![Factory::reply(200)])]);

    assert!(!coordinator.run("reboot", None).await);
    assert!(!coordinator.run("set-charge-mode", None).await);
    assert!(!coordinator.run("set-charge-mode", Some(9)).await);
    assert!(!coordinator.run("set-charge-mode", Some(-1)).await);

    assert_eq!(recorder.attempts(), 0);
}

#[tokio::test]
async fn run_connects_dispatches_and_disconnects() {
    common_setup();

    let (mut coordinator, recorder, _) = Factory::coordinator(vec![Factory::connection(vec![
        Factory::reply(200),
    ])]);

    assert!(coordinator.run("set-charge-mode", Some(0)).await);
    assert_eq!(recorder.attempts(), 1);
    assert_eq!(recorder.closes(), 1);
    assert!(!coordinator.session().is_connected());
    assert_eq!(recorder.sent()[0]["value"], json!(0));
}

#[tokio::test]
async fn run_disconnects_after_failure() {
    common_setup();

    let (mut coordinator, recorder, _) = Factory::coordinator(vec![Factory::connection(vec![
        Factory::info(vec![Factory::property(35, "output_mode", json!(1))]),
    ])]);

    assert!(!coordinator.run("get-load-state", None).await);
    assert_eq!(recorder.closes(), 1);
    assert!(!coordinator.session().is_connected());
}

#[tokio::test]
async fn run_fails_when_unreachable() {
    common_setup();

    let (mut coordinator, recorder, _) =
        Factory::coordinator(vec![Script::Refuse, Script::Refuse, Script::Refuse]);

    assert!(!coordinator.run("get-charge-mode", None).await);
    assert_eq!(recorder.attempts(), 3);
    assert!(recorder.sent().is_empty());
}

#[tokio::test]
async fn run_get_info() {
    common_setup();

    let (mut coordinator, recorder, _) = Factory::coordinator(vec![Factory::connection(vec![
        Factory::info(vec![Factory::property(1, "dianya", json!(12.8))]),
        Factory::info(vec![Factory::property(35, "output_mode", json!(1))]),
    ])]);

    assert!(coordinator.run("get-info", None).await);
    assert_eq!(recorder.sent_actions(), vec!["getMachinInfoOne", "getMachinInfoTwo"]);
    assert_eq!(recorder.closes(), 1);
}

#[tokio::test]
async fn run_monitor_until_server_closes() {
    common_setup();

    let (mut coordinator, recorder, _) = Factory::coordinator(vec![Factory::connection(vec![
        Inbound::json(json!({"property_id": 37, "value": 1})),
        Inbound::Closed,
    ])]);

    assert!(coordinator.run("monitor", None).await);
    assert!(recorder.sent().is_empty());
}

#[tokio::test]
async fn monitor_stops_on_shutdown() {
    common_setup();

    let (mut coordinator, _, channels) =
        Factory::coordinator(vec![Factory::connection(vec![])]);

    assert!(coordinator.connect().await);

    let mf = coordinator.monitor();
    let sf = async {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        channels.shutdown.send(()).unwrap();
    };

    let (stopped, ()) = futures::join!(mf, sf);
    assert!(stopped);
}

#[tokio::test]
async fn connect_uses_session_attempt_limit() {
    common_setup();

    let (connector, recorder) = MockConnector::new(vec![Script::Refuse; 5]);
    let timeouts = Timeouts {
        max_attempts: 2,
        ..Factory::config().timeouts()
    };
    let session = Session::new("ws://127.0.0.1:9/", Factory::mac(), Box::new(connector))
        .unwrap()
        .with_timeouts(timeouts);
    let mut coordinator = Coordinator::new(session, Channels::new());

    assert!(!coordinator.connect().await);
    assert_eq!(recorder.attempts(), 2);
}

#[tokio::test]
async fn get_charge_mode_skips_malformed_sibling() {
    common_setup();

    let (mut coordinator, _, _) = Factory::coordinator(vec![Factory::connection(vec![
        Factory::info(vec![
            Factory::property(35, "output_mode", json!(1)),
            json!({"property_id": 36, "unikey": 5, "value": 0}),
            json!({"property_id": [36], "value": 0}),
        ]),
    ])]);

    assert!(coordinator.connect().await);
    assert_eq!(coordinator.get_charge_mode().await, Some(json!(1)));
}

#[tokio::test]
async fn get_all_info_keeps_good_records_beside_bad_ones() {
    common_setup();

    let (mut coordinator, _, _) = Factory::coordinator(vec![Factory::connection(vec![
        Factory::info(vec![
            Factory::property(2, "cddl", json!(3.5)),
            json!({"property_id": {"bad": true}}),
        ]),
        Factory::info(vec![json!({"property_id": 1.0, "unikey": 7, "value": 12})]),
    ])]);

    assert!(coordinator.connect().await);
    let properties = coordinator.get_all_info().await;

    let keys: Vec<(i64, &str)> = properties.iter().map(|p| (p.property_id, p.unikey.as_str())).collect();
    assert_eq!(keys, vec![(1, "7"), (2, "cddl")]);
}
