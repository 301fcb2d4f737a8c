// End-to-end runs of the interpreter and results table over in-memory logs
use biathlon_engine::{results, Duration, Interpreter, RaceConfig, RunStats, Status};

fn config(json: &str) -> RaceConfig {
    RaceConfig::from_json(json).unwrap()
}

/// Run a log and return (narrative, results table, stats)
fn run(config: &RaceConfig, log: &str) -> (String, String, RunStats) {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut narrative = Vec::new();
    let mut interpreter = Interpreter::new(config);
    let stats = interpreter.run(log.as_bytes(), &mut narrative).unwrap();

    let store = interpreter.into_store();
    let mut table = Vec::new();
    results::write_table(&mut table, &results::standings(&store), config).unwrap();

    (
        String::from_utf8(narrative).unwrap(),
        String::from_utf8(table).unwrap(),
        stats,
    )
}

#[test]
fn test_two_lap_finish() {
    let config = config(
        r#"{"laps": 2, "lapLength": 3500, "penaltyLength": 150, "firingLines": 1,
            "start": "10:00:00.000", "startDelta": "00:00:30"}"#,
    );
    let log = "\
[09:05:59.867] 1 1
[09:15:00.841] 2 1 10:00:00.000
[09:59:45.000] 3 1
[10:00:00.500] 4 1
[10:19:00.000] 10 1
[10:38:00.000] 10 1
";

    let mut interpreter = Interpreter::new(&config);
    interpreter.run(log.as_bytes(), &mut std::io::sink()).unwrap();
    let record = interpreter.store().get("1").unwrap();
    assert!(!record.disqualified);
    assert_eq!(record.finish_time, Some(Duration::minutes(38)));
    assert_eq!(record.laps.len(), 2);
    assert!(record.laps.iter().all(|lap| lap.elapsed == Duration::minutes(19)));

    let (narrative, table, stats) = run(&config, log);
    assert_eq!(stats.events, 6);
    assert_eq!(
        narrative,
        "\
[09:05:59.867] The competitor(1) registered
[09:15:00.841] The start time for the competitor(1) was set by a draw to 10:00:00.000
[09:59:45.000] The competitor(1) is on the start line
[10:00:00.500] The competitor(1) has started
[10:19:00.000] The competitor(1) ended the main lap
[10:38:00.000] The competitor(1) ended the main lap
[10:38:00.000] The competitor(1) has finished
"
    );
    assert_eq!(
        table,
        "[00:38:00.000] 1 [{00:19:00.000, 3.070}, {00:19:00.000, 3.070}] {,} 0/10\n"
    );
}

#[test]
fn test_full_race_with_shooting_and_penalties() {
    let config = config(
        r#"{"laps": 2, "lapLen": 3651, "penaltyLen": 50, "firingLines": 1,
            "start": "09:30:00.000", "startDelta": "00:00:30"}"#,
    );
    let log = "\
[09:05:59.867] 1 1
[09:15:00.841] 2 1 09:30:00.000
[09:29:45.734] 3 1
[09:30:01.005] 4 1
[09:49:31.659] 5 1 1
[09:49:33.123] 6 1 1
[09:49:34.650] 6 1 2
[09:49:35.937] 6 1 4
[09:49:37.364] 6 1 5
[09:49:38.339] 7 1
[09:49:55.915] 8 1
[09:51:48.391] 9 1
[09:59:03.872] 10 1
[09:59:03.872] 11 1 Lost in the forest
";

    let (narrative, table, stats) = run(&config, log);
    assert_eq!(stats.skipped, 0);
    assert!(narrative.contains("[09:49:31.659] The competitor(1) is on the firing range(1)\n"));
    assert!(narrative.contains("[09:49:35.937] The target(4) has been hit by competitor(1)\n"));
    assert!(narrative.contains("[09:49:55.915] The competitor(1) entered the penalty laps\n"));
    assert!(narrative.contains("[09:51:48.391] The competitor(1) left the penalty laps\n"));
    assert!(narrative.ends_with("[09:59:03.872] The competitor(1) can`t continue: Lost in the forest\n"));

    // Lap: 09:30:00.000 -> 09:59:03.872 = 1743.872s, 3651 / 1743.872 = 2.0936...
    // Penalty: 50m x 1 miss over 112.476s = 0.4445...
    assert_eq!(
        table,
        "[NotFinished] 1 [{00:29:03.872, 2.093}, {,}] {00:01:52.476, 0.444} 4/5\n"
    );
}

#[test]
fn test_ordering_puts_unfinished_first() {
    let config = config(
        r#"{"laps": 1, "lapLength": 3000, "penaltyLength": 150, "firingLines": 2,
            "start": "10:00:00.000", "startDelta": "00:01:00"}"#,
    );
    let log = "\
[09:00:00.000] 1 slow
[09:00:00.000] 1 fast
[09:00:00.000] 1 late
[09:00:00.000] 1 quit
[09:10:00.000] 2 slow 10:00:00.000
[09:10:00.000] 2 fast 10:01:00.000
[09:10:00.000] 2 late 10:02:00.000
[09:10:00.000] 2 quit 10:03:00.000
[10:00:10.000] 4 slow
[10:01:10.000] 4 fast
[10:04:00.000] 4 late
[10:03:05.000] 4 quit
[10:10:00.000] 11 quit Broken ski
[10:20:00.000] 10 slow
[10:15:00.000] 10 fast
";

    let (narrative, table, _) = run(&config, log);
    assert!(narrative.contains("[10:04:00.000] The competitor(late) is disqualified\n"));

    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(
        lines,
        vec![
            "[NotStarted] late {,} {,} 0/0",
            "[NotFinished] quit {,} {,} 0/0",
            "[00:14:00.000] fast {00:14:00.000, 3.571} {,} 0/10",
            "[00:20:00.000] slow {00:20:00.000, 2.500} {,} 0/10",
        ]
    );
}

#[test]
fn test_laps_never_exceed_configured_count() {
    let config = config(
        r#"{"laps": 1, "lapLength": 3000, "penaltyLength": 150, "firingLines": 1,
            "start": "10:00:00.000", "startDelta": "00:00:30"}"#,
    );
    let log = "\
[09:00:00.000] 1 1
[09:10:00.000] 2 1 10:00:00.000
[10:00:01.000] 4 1
[10:15:00.000] 10 1
[10:30:00.000] 10 1
";

    let mut interpreter = Interpreter::new(&config);
    let stats = interpreter.run(log.as_bytes(), &mut std::io::sink()).unwrap();
    assert_eq!(stats.skipped, 1);

    let store = interpreter.into_store();
    let record = store.get("1").unwrap();
    assert_eq!(record.laps.len(), 1);
    assert_eq!(record.target_capacity, config.target_capacity(1));

    let table = results::standings(&store);
    assert_eq!(table[0].status, Status::Finished(Duration::minutes(15)));
}
