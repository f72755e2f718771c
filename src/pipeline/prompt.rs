use crate::config::ExtractionConfig;

/// Fixed system role for the extraction model.
pub const EXTRACTION_SYSTEM_PROMPT: &str =
    "You are an expert at extracting structured calendar events from academic syllabi. \
     Follow the user instructions exactly.";

/// Build the instruction prompt for one batch.
///
/// Deterministic given (course name, format notes, target year, batch
/// content): the same inputs always produce byte-identical prompts. The
/// embedded contract tells the model to return raw CSV under the fixed
/// header, prefix subjects with the course name, keep only explicitly
/// dated items, and collapse near-duplicates within the batch — the
/// reconciler dedupes again across batches, since the model never sees
/// more than one batch at a time.
pub fn build_extraction_prompt(config: &ExtractionConfig, batch: &str) -> String {
    let course = &config.course_name;
    let notes = &config.format_notes;
    let year = config.target_year;

    format!(
        r#"You are helping convert a college course syllabus into calendar assignments.

Here is a bit of information about the document's format: {notes}

You are also given excerpts from the syllabus, including some text blocks and tables marked with [TABLE START] and [TABLE END].

Extract any deliverables that have due dates — including assignments, readings, quizzes, presentations, projects, or exams.

Format your output as a CSV with the following columns:
Subject, Start Date, Start Time, End Date, End Time, All Day Event, Description, Location.

• Use the course name "{course}" as the prefix for every Subject (e.g., "{course}: Homework 1")
• Use the Description column to describe the assignment, reading, or quiz
• Leave the Location column blank unless an exam location is explicitly provided
• Only include deliverables with specific due dates
• Write Start Date as YYYY-MM-DD
• If no time is listed, classify it as an all day event
• If no end time is listed, make it 30 minutes after the start time
• Use {year} as the year for the date.
• If any field contains a comma, enclose it in double quotes
• If any two items have the same date and describe the same general task (even if the title or wording is slightly different), treat them as duplicates and only include one.

Return only the CSV — no extra explanation.

{batch}"#
    )
}
