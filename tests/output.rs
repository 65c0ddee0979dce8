use tasksheet::output::{format_human, HumanOutput};

#[test]
fn format_human_includes_sections() {
    let mut human = HumanOutput::new("tasksheet init: created workbook");
    human.push_summary("workbook", "/tmp/tasks.sheet.json");
    human.push_detail("[todo][bug] t1-0 Login");
    human.push_next_step("tasksheet list");

    let rendered = format_human(&human);
    assert!(rendered.contains("tasksheet init: created workbook"));
    assert!(rendered.contains("Summary:"));
    assert!(rendered.contains("- workbook: /tmp/tasks.sheet.json"));
    assert!(rendered.contains("Details:"));
    assert!(rendered.contains("- [todo][bug] t1-0 Login"));
    assert!(rendered.contains("Next steps:"));
    assert!(rendered.contains("- tasksheet list"));
}

#[test]
fn format_human_omits_empty_sections() {
    let human = HumanOutput::new("14650");
    let rendered = format_human(&human);
    assert_eq!(rendered, "14650");
}
