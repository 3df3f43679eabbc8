use autopost::activity::SystemStatus;
use autopost::config::{Config, PipelineConfig};
use autopost::controller::Controller;
use autopost::engine::probe::EnvProbe;
use autopost::tui::{dispatch_commands, TuiCommand};
use std::sync::Arc;
use tokio::sync::mpsc;

fn instant_controller() -> Arc<Controller> {
    let mut config = Config::default();
    config.pipeline = PipelineConfig::instant();
    config.pipeline.seed = Some(1);
    let probe = EnvProbe::from_pairs(Vec::<(String, String)>::new());
    Arc::new(Controller::new(&config, probe).unwrap())
}

#[tokio::test]
async fn test_quit_waits_for_in_flight_run() {
    let controller = instant_controller();
    let (tx, rx) = mpsc::channel(8);

    tx.send(TuiCommand::RunMock).await.unwrap();
    tx.send(TuiCommand::Quit).await.unwrap();
    dispatch_commands(controller.clone(), rx).await;

    let state = controller.snapshot();
    assert_eq!(state.status, SystemStatus::Active);
    assert!(!state.busy);
    assert_eq!(
        state.logs.last().map(|e| e.message.as_str()),
        Some("LinkedIn automation test completed successfully!")
    );
}

#[tokio::test]
async fn test_env_and_clear_commands() {
    let controller = instant_controller();
    let (tx, rx) = mpsc::channel(8);

    tx.send(TuiCommand::ShowEnv).await.unwrap();
    drop(tx);
    dispatch_commands(controller.clone(), rx).await;
    assert!(!controller.snapshot().logs.is_empty());

    let (tx, rx) = mpsc::channel(8);
    tx.send(TuiCommand::ClearLogs).await.unwrap();
    drop(tx);
    dispatch_commands(controller.clone(), rx).await;
    assert!(controller.snapshot().logs.is_empty());
}

#[tokio::test]
async fn test_real_run_command_without_credentials() {
    let controller = instant_controller();
    let (tx, rx) = mpsc::channel(8);

    tx.send(TuiCommand::RunReal).await.unwrap();
    drop(tx);
    dispatch_commands(controller.clone(), rx).await;

    let state = controller.snapshot();
    assert_eq!(state.logs.len(), 1);
    assert_eq!(state.status, SystemStatus::Inactive);
}
