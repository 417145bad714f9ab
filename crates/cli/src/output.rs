use providers::{RemoteFoodRecord, UserProfile};
use spoiler_core::models::{ImageReference, QuestionSet};
use std::io::Write;

pub fn print_questions<W: Write>(out: &mut W, set: &QuestionSet, json: bool) -> anyhow::Result<()> {
    if json {
        writeln!(
            out,
            "{}",
            serde_json::json!({ "count": set.len(), "questions": set.as_slice() })
        )?;
        return Ok(());
    }
    if set.is_empty() {
        writeln!(out, "No questions available. Please check your connection.")?;
        return Ok(());
    }
    for (i, q) in set.iter().enumerate() {
        writeln!(out, "{:>2}. {:<10} {}", i + 1, q.answer, q.source)?;
    }
    writeln!(out, "{} question(s)", set.len())?;
    Ok(())
}

pub fn print_records<W: Write>(
    out: &mut W,
    base_url: &str,
    records: &[RemoteFoodRecord],
    json: bool,
) -> anyhow::Result<()> {
    let rows: Vec<(ImageReference, &str)> = records
        .iter()
        .map(|r| (ImageReference::resolve(base_url, &r.image_uri), r.food_state.as_str()))
        .collect();
    if json {
        let items: Vec<_> = rows
            .iter()
            .map(|(image, state)| serde_json::json!({ "image": image, "food_state": state }))
            .collect();
        writeln!(out, "{}", serde_json::Value::Array(items))?;
        return Ok(());
    }
    for (image, state) in &rows {
        writeln!(out, "{:<11} {}", state, image)?;
    }
    writeln!(out, "{} record(s)", rows.len())?;
    Ok(())
}

pub fn print_profile<W: Write>(out: &mut W, profile: &UserProfile, json: bool) -> anyhow::Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(profile)?)?;
        return Ok(());
    }
    writeln!(out, "{}", profile.name)?;
    writeln!(out, "Profession: {}", profile.profession)?;
    if !profile.username.is_empty() {
        writeln!(out, "Username: {}", profile.username)?;
    }
    if let Some(dob) = &profile.date_of_birth {
        writeln!(out, "Date of birth: {}", dob)?;
    }
    if !profile.pfp_ext.is_empty() {
        writeln!(out, "Profile picture: {}", profile.pfp_ext)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use spoiler_core::models::{Answer, Question};

    #[test]
    fn question_listing_shows_answer_and_image() {
        let set = QuestionSet::new(vec![Question {
            source: ImageReference("http://b/api/food/image/1".into()),
            answer: Answer::NotEdible,
        }]);
        let mut buf = Vec::new();
        print_questions(&mut buf, &set, false).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Not Edible"));
        assert!(text.contains("http://b/api/food/image/1"));
        assert!(text.ends_with("1 question(s)\n"));
    }

    #[test]
    fn question_json_carries_count() {
        let mut buf = Vec::new();
        print_questions(&mut buf, &QuestionSet::default(), true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["count"], 0);
    }

    #[test]
    fn records_resolve_image_uris() {
        let records = vec![RemoteFoodRecord {
            image_uri: "/api/food/image/x".into(),
            food_state: "Rotten".into(),
        }];
        let mut buf = Vec::new();
        print_records(&mut buf, "http://host:3000/", &records, true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["image"], "http://host:3000/api/food/image/x");
        assert_eq!(value[0]["food_state"], "Rotten");
    }
}
