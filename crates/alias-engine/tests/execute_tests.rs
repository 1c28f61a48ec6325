use std::sync::Arc;

use alias_engine::*;

struct Host {
    dispatcher: Arc<InMemoryDispatcher>,
    console: Arc<RecordingSender>,
    registry: AliasRegistry,
}

fn host(json: &str) -> Host {
    host_with_config(json, AliasesConfig::default())
}

fn host_with_config(json: &str, config: AliasesConfig) -> Host {
    let dispatcher = Arc::new(InMemoryDispatcher::new());
    let console = Arc::new(RecordingSender::console());
    let registry = AliasRegistry::new(dispatcher.clone(), console.clone(), &config);
    let failures = registry
        .activate(registry.load(&InlineSource::json(json)).unwrap())
        .unwrap();
    assert!(failures.is_empty());
    Host {
        dispatcher,
        console,
        registry,
    }
}

#[test]
fn test_sender_and_argument_substitution() {
    let host = host(r#"[{"name": "shout", "commands": ["broadcast $sender says $arg0"]}]"#);
    let steve = RecordingSender::player("Steve");

    let outcome = host.dispatcher.execute_line(&steve, "shout hi").unwrap();

    assert_eq!(outcome, CommandOutcome::Success);
    assert_eq!(steve.dispatched(), vec!["broadcast Steve says hi"]);
}

#[test]
fn test_all_args_through_host_tokenizer() {
    let host = host(r#"[{"name": "relay", "commands": ["tell $arg*"]}]"#);
    let steve = RecordingSender::player("Steve");

    host.dispatcher.execute_line(&steve, "relay hello 5").unwrap();

    assert_eq!(steve.dispatched(), vec!["tell \"hello\" 5"]);
}

#[test]
fn test_valid_inputs_reject_dispatches_nothing() {
    let host = host(
        r#"[{"name": "pvp", "usage": "<on|off>", "commands": ["console:pvp $arg0"], "validInputs": [["on", "off"]]}]"#,
    );
    let steve = RecordingSender::player("Steve");

    let outcome = host.dispatcher.execute_line(&steve, "pvp maybe").unwrap();

    assert_eq!(outcome, CommandOutcome::ShowUsage);
    assert!(steve.dispatched().is_empty());
    assert!(host.console.dispatched().is_empty());
    assert_eq!(
        host.dispatcher.get("pvp").unwrap().usage(),
        Some("<on|off>")
    );
}

#[test]
fn test_valid_inputs_accept_dispatches_to_console() {
    let host = host(
        r#"[{"name": "pvp", "commands": ["console:pvp $arg0"], "validInputs": [["on", "off"]]}]"#,
    );
    let steve = RecordingSender::player("Steve");

    host.dispatcher.execute_line(&steve, "pvp off").unwrap();

    assert!(steve.dispatched().is_empty());
    assert_eq!(host.console.dispatched(), vec!["pvp off"]);
}

#[test]
fn test_console_and_sender_targets() {
    let host = host(
        r#"[{"name": "mixed", "commands": ["console:broadcast test", "broadcast test"]}]"#,
    );
    let steve = RecordingSender::player("Steve");

    host.dispatcher.execute_line(&steve, "mixed").unwrap();

    assert_eq!(host.console.dispatched(), vec!["broadcast test"]);
    assert_eq!(steve.dispatched(), vec!["broadcast test"]);
}

#[test]
fn test_custom_console_prefix() {
    let config = AliasesConfig {
        console_prefix: "sudo:".to_string(),
        ..AliasesConfig::default()
    };
    let host = host_with_config(
        r#"[{"name": "op", "commands": ["sudo:op $sender", "console:literal"]}]"#,
        config,
    );
    let steve = RecordingSender::player("Steve");

    host.dispatcher.execute_line(&steve, "op").unwrap();

    assert_eq!(host.console.dispatched(), vec!["op Steve"]);
    assert_eq!(steve.dispatched(), vec!["console:literal"]);
}

#[test]
fn test_missing_argument_leaves_token() {
    let host = host(r#"[{"name": "pay", "commands": ["pay $arg0 $arg1"]}]"#);
    let steve = RecordingSender::player("Steve");

    host.dispatcher.execute_line(&steve, "pay Alex").unwrap();

    assert_eq!(steve.dispatched(), vec!["pay Alex $arg1"]);
}

#[test]
fn test_dispatch_error_propagates() {
    let host = host(r#"[{"name": "twice", "commands": ["say one", "say two"]}]"#);
    let bob = RecordingSender::rejecting("Bob");

    let err = host.dispatcher.execute_line(&bob, "twice").unwrap_err();

    assert!(matches!(err, AliasError::Dispatch(_)));
}

#[test]
fn test_invocation_is_case_insensitive() {
    let host = host(r#"[{"name": "Home", "commands": ["tp $sender home"]}]"#);
    let steve = RecordingSender::player("Steve");

    host.dispatcher.execute_line(&steve, "HOME").unwrap();

    assert_eq!(steve.dispatched(), vec!["tp Steve home"]);
    assert_eq!(host.registry.get("home").unwrap().permission(), "alias.Home");
}
