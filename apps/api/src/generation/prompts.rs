// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Attributes emphasized when the caller does not pick any.
pub const DEFAULT_ATTRIBUTES: &[&str] = &["experience", "skills", "education", "location"];

/// Default target length of a connection message, in characters.
pub const DEFAULT_CHARACTER_LENGTH: u32 = 200;

/// Connection message prompt template.
/// Replace: {attributes}, {intent}, {character_length}, {body_only_instruction},
///          {user_profile}, {target_profile}
pub const CONNECTION_MESSAGE_PROMPT_TEMPLATE: &str = r#"You are an expert in generating LinkedIn connection messages.

Analyze both profiles below. Using the attributes [{attributes}] from both profiles and the intent of the connection ("{intent}"), write ONE connection message of about {character_length} characters that will build a genuine connection between the two people.

{body_only_instruction}

### Profiles

User profile:
{user_profile}

Target connection profile:
{target_profile}"#;

/// Voice script prompt template.
/// Replace: {intent}, {body_only_instruction}, {user_profile}, {target_profile}
pub const VOICE_SCRIPT_PROMPT_TEMPLATE: &str = r#"You are an expert in writing short LinkedIn voice notes.

Write a voice message script the user will record and send to the target connection. The intent of the connection is "{intent}".

REQUIREMENTS:
1. Length: 50-80 words, about 30-40 seconds when spoken aloud
2. Mention one or two things the two people have in common, taken from the profiles
3. Conversational, spoken register: short sentences, no lists, no emojis, no hashtags
4. End with a clear call-to-action closing line (for example, suggesting a short call or a reply)

{body_only_instruction}

### Profiles

User profile:
{user_profile}

Target connection profile:
{target_profile}"#;

/// System instruction for industry classification.
pub const INDUSTRY_SYSTEM: &str = "You are an expert labor-market analyst. \
    You classify professionals into the industry sector of their employers. \
    You answer with a single word and nothing else.";

/// Few-shot industry classification prompt. Replace `{profile}` before sending.
pub const INDUSTRY_PROMPT_TEMPLATE: &str = r#"Classify the LinkedIn profile below into exactly ONE industry, answered as a single word.

RULES:
- Classify by the sector of the companies the person works or worked for, NOT by their literal job title. A software engineer at a hospital works in Healthcare.
- If the career spans several industries, choose the dominant one: where most of the recent experience sits.
- Answer with the industry word only. No punctuation, no explanation.

EXAMPLES:

Profile: Senior Backend Engineer at Stripe; previously Software Engineer at Google.
Industry: Technology

Profile: Data Analyst at Walmart; previously Store Operations Lead at Target.
Industry: Retail

Profile: Product Manager at Mayo Clinic; previously Nurse Informaticist at Kaiser Permanente.
Industry: Healthcare

Profile:
{profile}
Industry:"#;

/// Fills `{name}` placeholders in a single left-to-right pass.
///
/// Substituted values are never rescanned, so braces inside a profile or an
/// intent reach the model verbatim. Unknown `{...}` sequences are kept as-is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];

        let matched = values.iter().find_map(|(name, value)| {
            tail.strip_prefix(name)
                .and_then(|after| after.strip_prefix('}'))
                .map(|after| (*value, after))
        });

        match matched {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}
