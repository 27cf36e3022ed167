use fabdeck::discover::payload::DiscoveryPayload;
use fabdeck::discover::{RawSchedule, TaskDescriptor, introspect};
use fabdeck::errors::FabdeckError;

fn payload(json: &str) -> DiscoveryPayload {
    serde_json::from_str(json).expect("valid discovery payload")
}

fn descriptors(json: &str) -> Vec<TaskDescriptor> {
    introspect(&payload(json))
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .expect("all tasks introspectable")
}

#[test]
fn flat_payload_maps_records_directly() {
    let tasks = descriptors(
        r#"[
            {
                "name": "deploy",
                "path": ["web"],
                "doc": "Deploy the site.",
                "schedule": "0 4 * * *",
                "argspec": {"args": ["target"], "varargs": null, "keywords": null, "defaults": null}
            }
        ]"#,
    );

    assert_eq!(tasks.len(), 1);
    let task = &tasks[0];
    assert_eq!(task.name, "deploy");
    assert_eq!(task.path, vec!["web".to_string()]);
    assert_eq!(task.doc.as_deref(), Some("Deploy the site."));
    assert_eq!(task.dotted_name(), "web.deploy");
    assert!(matches!(&task.schedule, Some(RawSchedule::Cron(c)) if c == "0 4 * * *"));
}

#[test]
fn flat_payload_accepts_prestructured_schedule() {
    let tasks = descriptors(
        r#"[
            {
                "name": "nightly",
                "argspec": {"args": []},
                "schedule": {
                    "time": {"seconds": "0", "minute": "0", "hour": "2"},
                    "month": "*",
                    "weekday": {"day": "*"},
                    "year": "*"
                }
            }
        ]"#,
    );

    match &tasks[0].schedule {
        Some(RawSchedule::Structured(s)) => assert_eq!(s.time.hour, "2"),
        other => panic!("expected structured schedule, got {other:?}"),
    }
}

#[test]
fn empty_schedule_object_means_unscheduled() {
    // Legacy parser scripts always emit the `schedule` key, with `{}` as
    // their unscheduled sentinel; one such record must not poison the
    // whole payload.
    let tasks = descriptors(
        r#"[
            {
                "name": "two",
                "path": [],
                "doc": "Task\n    two.",
                "schedule": {},
                "argspec": {"args": ["arg1"], "varargs": null, "keywords": null, "defaults": null}
            },
            {
                "name": "one",
                "schedule": "30 * * * *",
                "argspec": {"args": []}
            }
        ]"#,
    );

    assert_eq!(tasks.len(), 2);
    assert!(tasks[0].schedule.is_none());
    assert!(matches!(&tasks[1].schedule, Some(RawSchedule::Cron(c)) if c == "30 * * * *"));
}

#[test]
fn empty_schedule_object_in_snapshot_means_unscheduled() {
    let tasks = descriptors(
        r#"{
            "two": {
                "code_name": "two",
                "name": "two",
                "schedule": {},
                "argspec": {"args": ["arg1"]}
            }
        }"#,
    );

    assert!(tasks[0].schedule.is_none());
}

#[test]
fn unrecognized_schedule_object_is_rejected() {
    let result: Result<DiscoveryPayload, _> = serde_json::from_str(
        r#"[
            {
                "name": "t",
                "schedule": {"every": "fortnight"},
                "argspec": {"args": []}
            }
        ]"#,
    );

    assert!(result.is_err());
}

#[test]
fn snapshot_walk_accumulates_namespace_path() {
    let tasks = descriptors(
        r#"{
            "deploy": {
                "web": {
                    "restart": {
                        "code_name": "restart",
                        "name": "restart",
                        "doc": null,
                        "argspec": {"args": []}
                    }
                }
            },
            "top": {
                "code_name": "top",
                "name": "top",
                "argspec": {"args": []}
            }
        }"#,
    );

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].dotted_name(), "deploy.web.restart");
    assert_eq!(tasks[1].path, Vec::<String>::new());
    assert_eq!(tasks[1].dotted_name(), "top");
}

#[test]
fn wrapped_chain_is_unwound_to_the_innermost_callable() {
    let tasks = descriptors(
        r#"{
            "one": {
                "code_name": "outer",
                "name": "outer",
                "wrapped": {
                    "code_name": "middle",
                    "name": "middle",
                    "wrapped": {
                        "code_name": "one",
                        "name": "one",
                        "doc": "Task one.",
                        "schedule": "30 * * * *",
                        "argspec": {"args": []}
                    }
                }
            }
        }"#,
    );

    let task = &tasks[0];
    assert_eq!(task.name, "one");
    assert_eq!(task.doc.as_deref(), Some("Task one."));
    assert!(matches!(&task.schedule, Some(RawSchedule::Cron(c)) if c == "30 * * * *"));
}

#[test]
fn generic_wrapper_recovers_original_from_closure_preferring_func() {
    let tasks = descriptors(
        r#"{
            "three": {
                "code_name": "inner_decorator",
                "name": "inner_decorator",
                "closure": {
                    "fn": {
                        "code_name": "decoy",
                        "name": "decoy",
                        "argspec": {"args": []}
                    },
                    "func": {
                        "code_name": "three",
                        "name": "three",
                        "doc": "Take three.",
                        "argspec": {"args": ["c", "d"], "defaults": [1]}
                    }
                }
            }
        }"#,
    );

    let task = &tasks[0];
    assert_eq!(task.name, "three");
    assert_eq!(task.doc.as_deref(), Some("Take three."));
    assert_eq!(task.params.default_for("d").as_deref(), Some("1"));
}

#[test]
fn generic_wrapper_falls_back_to_fn_cell() {
    let tasks = descriptors(
        r#"{
            "cron_task": {
                "code_name": "inner_decorator",
                "name": "inner_decorator",
                "closure": {
                    "fn": {
                        "code_name": "cron_task",
                        "name": "cron_task",
                        "argspec": {"args": []}
                    }
                }
            }
        }"#,
    );

    assert_eq!(tasks[0].name, "cron_task");
}

#[test]
fn task_name_falls_back_to_namespace_key() {
    let tasks = descriptors(
        r#"{
            "aliased": {
                "code_name": "real_impl",
                "name": null,
                "argspec": {"args": []}
            }
        }"#,
    );

    assert_eq!(tasks[0].name, "aliased");
}

#[test]
fn missing_argspec_is_an_uninspectable_task() {
    let results = introspect(&payload(
        r#"{
            "native": {
                "code_name": "builtin",
                "name": "native"
            },
            "fine": {
                "code_name": "fine",
                "name": "fine",
                "argspec": {"args": []}
            }
        }"#,
    ));

    assert_eq!(results.len(), 2);
    let err = results[0].as_ref().expect_err("native is uninspectable");
    assert!(matches!(err, FabdeckError::UninspectableTask { task, .. } if task == "native"));
    assert!(results[1].is_ok());
}

#[test]
fn defaults_right_align_onto_trailing_parameters() {
    let tasks = descriptors(
        r#"[
            {
                "name": "t",
                "argspec": {"args": ["a", "b", "c"], "defaults": [5]}
            }
        ]"#,
    );

    let params = &tasks[0].params;
    assert_eq!(params.default_for("a"), None);
    assert_eq!(params.default_for("b"), None);
    assert_eq!(params.default_for("c").as_deref(), Some("5"));
}

#[test]
fn variadic_flags_are_carried() {
    let tasks = descriptors(
        r#"[
            {
                "name": "t",
                "argspec": {"args": ["a"], "varargs": "rest", "keywords": "kw"}
            }
        ]"#,
    );

    assert!(tasks[0].params.varargs);
    assert!(tasks[0].params.keywords);
}
