use std::time::Duration;

use orchestrate_common::error::{FleetError, RemoteError};
use orchestrate_common::fleet::operation::UploadSource;
use orchestrate_common::fleet::selection::Selection;
use orchestrate_common::fleet::target::Target;
use orchestrate_core::batch::BatchRunner;

use crate::support::{FakeFleet, FakeHost, fleet_service, registry_dir};

fn three_hosts() -> FakeFleet {
    FakeFleet::new()
        .host("10.0.0.1", FakeHost::answering("pa", "alpha\n"))
        .host("10.0.0.3", FakeHost::answering("pc", "gamma\n"))
}

/// The second host is missing from the fake fleet, so connecting to it fails.
#[tokio::test]
async fn batch_isolates_an_unreachable_host() {
    let (_dir, registry) = registry_dir();
    let fleet = three_hosts();
    let service = fleet_service(&registry, &fleet, BatchRunner::new(3, None));

    service.add_target("a:pa@10.0.0.1").unwrap();
    service.add_target("b:pb@10.0.0.2").unwrap();
    service.add_target("c:pc@10.0.0.3").unwrap();

    let report = service
        .run_command(&Selection::all(), "hostname", false)
        .await
        .unwrap();

    assert_eq!(report.len(), 3);
    assert_eq!(report.results[0].output, "alpha\n");
    assert!(report.results[0].succeeded());
    assert!(matches!(
        report.results[1].error,
        Some(RemoteError::ConnectionFailed { .. })
    ));
    assert_eq!(report.results[2].output, "gamma\n");
    assert!(report.results[2].succeeded());
    assert_eq!(fleet.open_sessions(), 0);
}

#[tokio::test]
async fn wrong_password_is_an_authentication_failure() {
    let (_dir, registry) = registry_dir();
    let fleet = three_hosts();
    let service = fleet_service(&registry, &fleet, BatchRunner::sequential());
    service.add_target("a:nope@10.0.0.1").unwrap();

    let report = service
        .run_command(&Selection::single("10.0.0.1"), "id", false)
        .await
        .unwrap();

    assert!(
        report.results[0]
            .error
            .as_ref()
            .is_some_and(RemoteError::is_auth_failure)
    );
}

#[tokio::test]
async fn elevated_run_pipes_the_password_to_sudo() {
    let (_dir, registry) = registry_dir();
    let fleet = FakeFleet::new().host("10.0.0.1", FakeHost::answering("secret", "root\n"));
    let service = fleet_service(&registry, &fleet, BatchRunner::sequential());
    service.add_target("alice:secret@10.0.0.1").unwrap();

    let report = service
        .run_command(&Selection::single("10.0.0.1"), "whoami", true)
        .await
        .unwrap();

    assert!(report.all_succeeded());
    let (ip, invocation) = &fleet.invocations()[0];
    assert_eq!(ip, "10.0.0.1");
    assert_eq!(invocation.command, "sudo -S -p '' whoami");
    assert_eq!(invocation.stdin.as_deref(), Some("secret\n"));
}

#[tokio::test]
async fn non_zero_exit_fails_only_that_target() {
    let (_dir, registry) = registry_dir();
    let fleet = FakeFleet::new()
        .host("10.0.0.1", FakeHost::answering("p", "fine\n"))
        .host("10.0.0.2", FakeHost::answering("p", "disk full\n").exiting(1));
    let service = fleet_service(&registry, &fleet, BatchRunner::new(2, None));
    service.add_target("u:p@10.0.0.1").unwrap();
    service.add_target("u:p@10.0.0.2").unwrap();

    let report = service
        .run_command(&Selection::many("10.0.0.1 10.0.0.2"), "df -h", false)
        .await
        .unwrap();

    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.results[1].output, "disk full\n");
    assert_eq!(
        report.results[1].error,
        Some(RemoteError::RemoteCommandFailed {
            exit_status: Some(1)
        })
    );
}

#[tokio::test]
async fn slow_host_times_out_alone() {
    let (_dir, registry) = registry_dir();
    let fleet = FakeFleet::new()
        .host("10.0.0.1", FakeHost::answering("p", "quick\n"))
        .host(
            "10.0.0.2",
            FakeHost::answering("p", "late\n").slow(Duration::from_secs(2)),
        );
    let service = fleet_service(
        &registry,
        &fleet,
        BatchRunner::new(2, Some(Duration::from_millis(250))),
    );
    service.add_target("u:p@10.0.0.1").unwrap();
    service.add_target("u:p@10.0.0.2").unwrap();

    let report = service
        .run_command(&Selection::all(), "uptime", false)
        .await
        .unwrap();

    assert!(report.results[0].succeeded());
    assert_eq!(
        report.results[1].error,
        Some(RemoteError::Timeout {
            limit: Duration::from_millis(250)
        })
    );
}

#[tokio::test]
async fn killed_command_is_a_failure() {
    let (_dir, registry) = registry_dir();
    let fleet = FakeFleet::new().host("10.0.0.1", FakeHost::answering("p", "half\n").killed());
    let service = fleet_service(&registry, &fleet, BatchRunner::sequential());
    service.add_target("u:p@10.0.0.1").unwrap();

    let report = service
        .run_command(&Selection::single("10.0.0.1"), "make", false)
        .await
        .unwrap();

    assert!(!report.all_succeeded());
    assert_eq!(
        report.results[0].error,
        Some(RemoteError::RemoteCommandFailed { exit_status: None })
    );
}

/// With one job at a time, a timed-out host must be torn down before the next one starts.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sequential_timeouts_do_not_overlap() {
    let (_dir, registry) = registry_dir();
    let stalled = FakeHost::answering("p", "late\n").slow(Duration::from_secs(10));
    let fleet = FakeFleet::new()
        .host("10.0.0.1", stalled.clone())
        .host("10.0.0.2", stalled)
        .host("10.0.0.3", FakeHost::answering("p", "quick\n"));
    let service = fleet_service(
        &registry,
        &fleet,
        BatchRunner::new(1, Some(Duration::from_millis(100))),
    );
    for ip in ["10.0.0.1", "10.0.0.2", "10.0.0.3"] {
        service.add_target(&format!("u:p@{ip}")).unwrap();
    }

    let started = std::time::Instant::now();
    let report = service
        .run_command(&Selection::all(), "uptime", false)
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(report.failed(), 2);
    assert!(report.results[2].succeeded());
    assert_eq!(fleet.open_sessions(), 0);
}

#[tokio::test]
async fn unmatched_selection_runs_nothing() {
    let (_dir, registry) = registry_dir();
    let fleet = three_hosts();
    let service = fleet_service(&registry, &fleet, BatchRunner::sequential());
    service.add_target("a:pa@10.0.0.1").unwrap();

    let err = service
        .run_command(&Selection::many("192.168.1.1 192.168.1.2"), "reboot", true)
        .await
        .unwrap_err();

    assert!(matches!(err, FleetError::NoTargetsResolved));
    assert!(fleet.invocations().is_empty());
}

#[tokio::test]
async fn overlapping_criteria_run_twice() {
    let (_dir, registry) = registry_dir();
    let fleet = three_hosts();
    let service = fleet_service(&registry, &fleet, BatchRunner::sequential());
    service.add_target("a:pa@10.0.0.1").unwrap();

    let selection = Selection {
        single: Some("10.0.0.1".into()),
        many: None,
        all: true,
    };
    let report = service.run_command(&selection, "date", false).await.unwrap();

    assert_eq!(report.len(), 2);
    assert_eq!(fleet.invocations().len(), 2);
}

#[tokio::test]
async fn file_upload_reaches_every_target() {
    let (dir, registry) = registry_dir();
    let local = dir.path().join("motd");
    std::fs::write(&local, "welcome\n").unwrap();

    let fleet = three_hosts();
    let service = fleet_service(&registry, &fleet, BatchRunner::new(2, None));
    service.add_target("a:pa@10.0.0.1").unwrap();
    service.add_target("c:pc@10.0.0.3").unwrap();

    let report = service
        .upload(&Selection::all(), UploadSource::File(local.clone()), "/etc/")
        .await
        .unwrap();

    assert!(report.all_succeeded());
    let mut uploads = fleet.uploads();
    uploads.sort();
    assert_eq!(
        uploads,
        vec![
            ("10.0.0.1".to_string(), local.clone(), "/etc/motd".to_string()),
            ("10.0.0.3".to_string(), local, "/etc/motd".to_string()),
        ]
    );
}

#[tokio::test]
async fn directory_upload_reports_not_implemented() {
    let (dir, registry) = registry_dir();
    let fleet = three_hosts();
    let service = fleet_service(&registry, &fleet, BatchRunner::sequential());
    service
        .insert_target(Target::new("a", "pa", "10.0.0.1"))
        .unwrap();

    let report = service
        .upload(
            &Selection::single("10.0.0.1"),
            UploadSource::Directory(dir.path().to_path_buf()),
            "/srv/",
        )
        .await
        .unwrap();

    assert_eq!(
        report.results[0].error,
        Some(RemoteError::NotImplemented {
            feature: "directory upload"
        })
    );
    assert!(fleet.uploads().is_empty());
}
