use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

use test_helpers::{add_entry, base_daybook_command, configure_daybook_command};

#[test]
#[serial]
fn test_cli_no_args_lists_empty_diary() {
    let temp_dir = tempdir().unwrap();

    base_daybook_command(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("일기 0개 · 0자 · 연속 0일"))
        .stdout(predicate::str::contains("아직 작성한 일기가 없습니다"));

    assert!(temp_dir.path().join("daybook.db").exists());
}

#[test]
#[serial]
fn test_cli_add_and_list_grouped_by_month() {
    let temp_dir = tempdir().unwrap();
    add_entry(temp_dir.path(), "초여름", "장마 시작", "2025-06-28 08:00");
    add_entry(temp_dir.path(), "바다", "파도", "2025-07-04 15:05");
    add_entry(temp_dir.path(), "산", "바람", "2025-07-05 09:00");

    let output = base_daybook_command(temp_dir.path())
        .arg("list")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("일기 3개 · 9자 · 연속 2일"));
    let july = stdout.find("2025년 7월").unwrap();
    let june = stdout.find("2025년 6월").unwrap();
    assert!(july < june, "newer month should be listed first:\n{}", stdout);

    // Newest first inside the month
    assert!(stdout.find("산").unwrap() < stdout.find("바다").unwrap());
    assert!(stdout.contains("7월 4일 (금) 오후 3:05  바다"));
}

#[test]
#[serial]
fn test_cli_list_oldest_first() {
    let temp_dir = tempdir().unwrap();
    add_entry(temp_dir.path(), "첫째", "a", "2025-07-01");
    add_entry(temp_dir.path(), "둘째", "b", "2025-07-02");

    let output = base_daybook_command(temp_dir.path())
        .args(["list", "--sort", "oldest"])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.find("첫째").unwrap() < stdout.find("둘째").unwrap());
}

#[test]
#[serial]
fn test_cli_search_by_weekday_and_text() {
    let temp_dir = tempdir().unwrap();
    add_entry(temp_dir.path(), "금요일 산책", "공원", "2025-07-04");
    add_entry(temp_dir.path(), "주말", "Hello World", "2025-07-05");

    base_daybook_command(temp_dir.path())
        .args(["list", "--search", "금"])
        .assert()
        .success()
        .stdout(predicate::str::contains("금요일 산책"))
        .stdout(predicate::str::contains("주말").not());

    base_daybook_command(temp_dir.path())
        .args(["list", "-s", "HELLO"])
        .assert()
        .success()
        .stdout(predicate::str::contains("주말"))
        .stdout(predicate::str::contains("일기 1개"));

    base_daybook_command(temp_dir.path())
        .args(["list", "-s", "없는말"])
        .assert()
        .success()
        .stdout(predicate::str::contains("'없는말'에 해당하는 일기가 없습니다"));
}

#[test]
#[serial]
fn test_cli_add_reads_content_from_stdin() {
    let temp_dir = tempdir().unwrap();

    base_daybook_command(temp_dir.path())
        .args(["add", "--title", "표준입력", "--date", "2025-07-04"])
        .write_stdin("파이프로 들어온 내용")
        .assert()
        .success()
        .stdout(predicate::str::contains("저장했습니다"));

    base_daybook_command(temp_dir.path())
        .args(["list", "-s", "파이프"])
        .assert()
        .success()
        .stdout(predicate::str::contains("표준입력"));
}

#[test]
#[serial]
fn test_cli_piped_content_drops_final_newline() {
    let temp_dir = tempdir().unwrap();

    base_daybook_command(temp_dir.path())
        .args(["add", "-t", "x", "--date", "2025-07-04"])
        .write_stdin("오늘\n")
        .assert()
        .success();

    base_daybook_command(temp_dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("일기 1개 · 2자 · 연속 1일"));
}

#[test]
#[serial]
fn test_cli_add_rejects_blank_title() {
    let temp_dir = tempdir().unwrap();

    base_daybook_command(temp_dir.path())
        .args(["add", "--title", "   ", "--content", "내용"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("title cannot be blank"));

    base_daybook_command(temp_dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("일기 0개"));
}

#[test]
#[serial]
fn test_cli_add_invalid_date() {
    let temp_dir = tempdir().unwrap();

    base_daybook_command(temp_dir.path())
        .args(["add", "-t", "t", "-c", "c", "--date", "not-a-date"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date format"));
}

#[test]
#[serial]
fn test_cli_add_with_image_then_show() {
    let temp_dir = tempdir().unwrap();
    let image_path = temp_dir.path().join("photo.jpg");
    fs::write(&image_path, [0xffu8, 0xd8, 0xff, 0xe0]).unwrap();

    let output = base_daybook_command(temp_dir.path())
        .args(["add", "-t", "사진", "-c", "노을", "-d", "2025-07-04 19:30", "--image"])
        .arg(&image_path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let id = stdout.trim().rsplit(' ').next().unwrap().to_string();

    base_daybook_command(temp_dir.path())
        .args(["show", &id[..8]])
        .assert()
        .success()
        .stdout(predicate::str::contains("# 사진"))
        .stdout(predicate::str::contains("2025년 7월 4일 금요일 오후 7:30"))
        .stdout(predicate::str::contains("[이미지 4 바이트]"))
        .stdout(predicate::str::contains(id.as_str()));
}

#[test]
#[serial]
fn test_cli_show_unknown_id() {
    let temp_dir = tempdir().unwrap();

    base_daybook_command(temp_dir.path())
        .args(["show", "ffffffff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No entry id starts with"));
}

#[test]
#[serial]
fn test_cli_edit_entry() {
    let temp_dir = tempdir().unwrap();
    let id = add_entry(temp_dir.path(), "초안", "처음 내용", "2025-07-04 10:00");

    base_daybook_command(temp_dir.path())
        .args(["edit", &id, "--title", "완성", "--date", "2025-07-06"])
        .assert()
        .success()
        .stdout(predicate::str::contains("수정했습니다"));

    base_daybook_command(temp_dir.path())
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("# 완성"))
        .stdout(predicate::str::contains("처음 내용"))
        // A bare date keeps the entry's time of day
        .stdout(predicate::str::contains("2025년 7월 6일 일요일 오전 10:00"));
}

#[test]
#[serial]
fn test_cli_edit_rejects_blank_content() {
    let temp_dir = tempdir().unwrap();
    let id = add_entry(temp_dir.path(), "제목", "내용", "2025-07-04");

    base_daybook_command(temp_dir.path())
        .args(["edit", &id, "--content", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("content cannot be blank"));

    base_daybook_command(temp_dir.path())
        .args(["show", &id])
        .assert()
        .stdout(predicate::str::contains("내용"));
}

#[test]
#[serial]
fn test_cli_delete_requires_confirmation() {
    let temp_dir = tempdir().unwrap();
    let id = add_entry(temp_dir.path(), "지울까", "고민", "2025-07-04");

    base_daybook_command(temp_dir.path())
        .args(["delete", &id])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("이 일기를 삭제하시겠습니까?"))
        .stdout(predicate::str::contains("취소했습니다"));

    base_daybook_command(temp_dir.path())
        .arg("stats")
        .assert()
        .stdout(predicate::str::contains("일기 1개"));

    base_daybook_command(temp_dir.path())
        .args(["delete", &id])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("삭제했습니다"));

    base_daybook_command(temp_dir.path())
        .arg("stats")
        .assert()
        .stdout(predicate::str::contains("일기 0개"));
}

#[test]
#[serial]
fn test_cli_delete_with_yes_flag() {
    let temp_dir = tempdir().unwrap();
    let id = add_entry(temp_dir.path(), "바로 삭제", "x", "2025-07-04");

    base_daybook_command(temp_dir.path())
        .args(["delete", &id[..8], "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("삭제했습니다"));

    base_daybook_command(temp_dir.path())
        .args(["show", &id])
        .assert()
        .failure();
}

#[test]
#[serial]
fn test_cli_stats_streak_with_gap() {
    let temp_dir = tempdir().unwrap();
    add_entry(temp_dir.path(), "a", "12345", "2025-06-20");
    add_entry(temp_dir.path(), "b", "12", "2025-07-01");
    add_entry(temp_dir.path(), "c", "1", "2025-07-03");
    add_entry(temp_dir.path(), "d", "1", "2025-07-04");

    base_daybook_command(temp_dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("일기 4개 · 9자 · 연속 3일"));

    base_daybook_command(temp_dir.path())
        .args(["stats", "--search", "6월"])
        .assert()
        .success()
        .stdout(predicate::str::contains("일기 1개 · 5자 · 연속 1일"));
}

#[test]
#[serial]
fn test_cli_export_markdown_oldest_first() {
    let temp_dir = tempdir().unwrap();
    add_entry(temp_dir.path(), "나중", "둘째 날", "2025-07-10 23:59");
    add_entry(temp_dir.path(), "먼저", "첫째 날", "2025-07-01 00:00");
    add_entry(temp_dir.path(), "범위 밖", "제외", "2025-07-11 00:00");
    let output_path = temp_dir.path().join("exports/july.md");

    base_daybook_command(temp_dir.path())
        .args(["export", "--from", "2025-07-01", "--to", "20250710", "--output"])
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("2개의 일기를 내보냈습니다"));

    let document = fs::read_to_string(&output_path).unwrap();
    assert!(document.starts_with("# 먼저"));
    assert!(document.find("# 먼저").unwrap() < document.find("# 나중").unwrap());
    assert!(!document.contains("범위 밖"));
    assert!(document.contains("page-break-after"));
}

#[test]
#[serial]
fn test_cli_export_json() {
    let temp_dir = tempdir().unwrap();
    let id = add_entry(temp_dir.path(), "json", "본문", "2025-07-04 09:00");
    let output_path = temp_dir.path().join("out.json");

    base_daybook_command(temp_dir.path())
        .args([
            "export", "--from", "2025-07-01", "--to", "2025-07-31", "--format", "json", "-o",
        ])
        .arg(&output_path)
        .assert()
        .success();

    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(parsed[0]["id"], id.as_str());
    assert_eq!(parsed[0]["has_image"], false);
}

#[test]
#[serial]
fn test_cli_export_reversed_range_fails() {
    let temp_dir = tempdir().unwrap();

    base_daybook_command(temp_dir.path())
        .args(["export", "--from", "2025-07-10", "--to", "2025-07-01", "-o", "x.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Export error"));
}

#[test]
#[serial]
fn test_cli_unlock_is_remembered_until_lock() {
    let temp_dir = tempdir().unwrap();
    add_entry(temp_dir.path(), "비밀", "내용", "2025-07-04");

    // Within the re-lock window the passphrase is not asked for again
    let mut cmd = Command::cargo_bin("daybook").unwrap();
    configure_daybook_command(&mut cmd, temp_dir.path());
    cmd.env("DAYBOOK_TEST_PASSPHRASE", "wrong-passphrase")
        .arg("stats")
        .assert()
        .success();

    base_daybook_command(temp_dir.path())
        .arg("lock")
        .assert()
        .success()
        .stdout(predicate::str::contains("일기를 잠갔습니다"));

    let mut cmd = Command::cargo_bin("daybook").unwrap();
    configure_daybook_command(&mut cmd, temp_dir.path());
    cmd.env("DAYBOOK_TEST_PASSPHRASE", "wrong-passphrase")
        .arg("list")
        .assert()
        .failure()
        .stdout(predicate::str::contains("비밀").not())
        .stderr(predicate::str::contains("Authentication failed"))
        .stderr(predicate::str::contains("Journal is locked"));

    // The right passphrase still works
    base_daybook_command(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("비밀"));
}

#[test]
#[serial]
fn test_cli_zero_timeout_always_asks() {
    let temp_dir = tempdir().unwrap();
    add_entry(temp_dir.path(), "t", "c", "2025-07-04");
    std::thread::sleep(std::time::Duration::from_millis(20));

    let mut cmd = Command::cargo_bin("daybook").unwrap();
    configure_daybook_command(&mut cmd, temp_dir.path());
    cmd.env("DAYBOOK_REAUTH_TIMEOUT", "0")
        .env("DAYBOOK_TEST_PASSPHRASE", "wrong-passphrase")
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Journal is locked"));
}

#[test]
#[serial]
fn test_cli_json_logging_carries_root_span() {
    let temp_dir = tempdir().unwrap();

    let output = base_daybook_command(temp_dir.path())
        .env("RUST_LOG", "info")
        .args(["--log-format", "json", "stats"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    let first_line = stderr.lines().next().expect("expected log output");
    let record: serde_json::Value = serde_json::from_str(first_line).unwrap();
    assert!(record.get("level").is_some());
    assert!(stderr.contains("correlation_id"));
    assert!(stderr.contains("app_invocation"));
}

#[test]
#[serial]
fn test_cli_rejects_relative_data_dir() {
    let temp_dir = tempdir().unwrap();

    base_daybook_command(temp_dir.path())
        .env("DAYBOOK_DIR", "relative/diary")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("absolute"));
}

#[test]
#[serial]
fn test_cli_help_lists_commands() {
    let temp_dir = tempdir().unwrap();

    base_daybook_command(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("--log-format"));
}

#[test]
#[serial]
fn test_cli_list_help_shows_sort_values() {
    let temp_dir = tempdir().unwrap();

    base_daybook_command(temp_dir.path())
        .args(["list", "-h"])
        .assert()
        .success()
        .stdout(predicate::str::contains("possible values: newest, oldest"));
}
