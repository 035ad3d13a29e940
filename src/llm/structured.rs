use serde::{ Serialize, Deserialize };

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Example {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub output: String,
}

/// Schema the model is instructed to answer with. `sections` is the one
/// mandatory key; a payload without it is not treated as structured.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructuredReply {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    pub sections: Vec<Section>,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Heuristic extraction of a structured reply embedded in free text. Slices
/// from the first `{` to the last `}` so prose or markdown fencing around
/// the JSON body is tolerated. Returns `None` when no brace pair exists,
/// the slice is not valid JSON, or the value lacks a `sections` array.
pub fn try_parse_structured(text: &str) -> Option<StructuredReply> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

/// Renders a structured reply to Markdown. Absent fields are omitted and
/// output is byte-identical across calls for the same input.
pub fn structured_to_markdown(reply: &StructuredReply) -> String {
    let mut out = String::new();

    if let Some(title) = &reply.title {
        out.push_str(&format!("# {}\n\n", title));
    }
    if let Some(summary) = &reply.summary {
        out.push_str(&format!("{}\n\n", summary));
    }
    for section in &reply.sections {
        out.push_str(&format!("## {}\n\n{}\n\n", section.heading, section.content));
    }
    if !reply.examples.is_empty() {
        out.push_str("## Examples\n\n");
        for example in &reply.examples {
            out.push_str(
                &format!(
                    "**Input**\n\n```\n{}\n```\n\n**Output**\n\n```\n{}\n```\n\n",
                    example.input,
                    example.output
                )
            );
        }
    }
    if let Some(notes) = reply.notes.as_deref() {
        if !notes.is_empty() {
            out.push_str(&format!("> {}\n", notes));
        }
    }

    out.trim().to_string()
}
