use crate::wire::LessonPlanRequest;

fn instructions() -> &'static str {
r#"Return the response strictly as a valid JSON object with the following structure.
Do not add commentary before or after the JSON."#
}

fn schema_template(req: &LessonPlanRequest) -> String {
    // Echoed fields are embedded as JSON strings so quotes in user input stay valid.
    let q = |s: &str| serde_json::Value::String(s.to_string()).to_string();
    format!(
r#"{{
    "topic": {topic},
    "subject": {subject},
    "grade": {grade},
    "duration": {duration},
    "objectives": ["List of learning objectives"],
    "introduction": "A short story or hook to introduce the topic",
    "explanation_steps": ["Step 1: ...", "Step 2: ..."],
    "activities": [
        {{
            "title": "Activity Title",
            "time": "Duration",
            "description": "Brief description"
        }}
    ],
    "real_life_examples": ["Example 1", "Example 2"],
    "blackboard_summary": ["Key point 1", "Key point 2"],
    "homework": ["Homework item 1", "Homework item 2"],
    "assessment": ["Question 1", "Question 2"],
    "image_keywords": ["keyword1", "keyword2", "keyword3", "keyword4"]
}}"#,
        topic = q(&req.topic),
        subject = q(&req.subject),
        grade = q(&req.grade),
        duration = q(&req.duration),
    )
}

pub fn lesson_prompt(req: &LessonPlanRequest) -> String {
    format!(
        "Create a detailed lesson plan for a {duration} class.\n\
         Class/Grade: {grade}\n\
         Subject: {subject}\n\
         Topic: {topic}\n\n\
         {instructions}\n\
         {template}\n",
        duration = req.duration,
        grade = req.grade,
        subject = req.subject,
        topic = req.topic,
        instructions = instructions(),
        template = schema_template(req),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::Credential;

    fn req() -> LessonPlanRequest {
        LessonPlanRequest {
            grade: "Class 5".into(),
            subject: "Science".into(),
            topic: "Photosynthesis".into(),
            duration: "40 mins".into(),
            credential: Credential::new("k"),
        }
    }

    #[test]
    fn prompt_states_parameters() {
        let p = lesson_prompt(&req());
        assert!(p.contains("lesson plan for a 40 mins class"));
        assert!(p.contains("Class/Grade: Class 5"));
        assert!(p.contains("Subject: Science"));
        assert!(p.contains("Topic: Photosynthesis"));
    }

    #[test]
    fn template_lists_every_field_once() {
        let p = lesson_prompt(&req());
        for key in [
            "topic", "subject", "grade", "duration", "objectives", "introduction",
            "explanation_steps", "activities", "real_life_examples", "blackboard_summary",
            "homework", "assessment", "image_keywords",
        ] {
            assert_eq!(p.matches(&format!("\"{key}\":")).count(), 1, "key {key}");
        }
    }

    #[test]
    fn template_is_valid_json_even_with_quotes() {
        let mut r = req();
        r.topic = "The \"water\" cycle".into();
        let t = schema_template(&r);
        let v: serde_json::Value = serde_json::from_str(&t).unwrap();
        assert_eq!(v["topic"], "The \"water\" cycle");
        assert_eq!(v["grade"], "Class 5");
    }

    #[test]
    fn prompt_never_contains_credential() {
        let mut r = req();
        r.credential = Credential::new("super-secret-key");
        assert!(!lesson_prompt(&r).contains("super-secret-key"));
    }
}
