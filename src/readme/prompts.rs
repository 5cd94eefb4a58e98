//! Instruction texts sent to the text-generation collaborator.

use crate::config::{Language, ProjectConfig};
use crate::ports::Message;

const REQUIREMENTS_INSTRUCTION: &str = "Based on the following Python code and the existing \
environment-exported `requirements.txt`, generate a new `requirements.txt` file. Ensure that the \
final file accurately reflects the modules used in the code, removing any unnecessary dependencies \
and including the correct versions.\n";

const REQUIREMENTS_OUTPUT_FORM: &str = "The output should be a markdown code snippet formatted in \
JSON, such as: ```json {\"requirements\": [\"module1==1.0.0\", \"module2==2.0.0\"]} ```";

const DESCRIPTION_INSTRUCTION: &str = "Please generate a summarized description that outlines the \
functionality of the following code/script, including its input and output parameters, key \
algorithms or logic. Ensure the description is clear and concise, suitable for technical \
documentation or code comments.";

const README_INSTRUCTION: &str = "Generate a comprehensive README file for this project that \
includes, but is not limited to the following sections. If specific details are unknown, set <> as \
placeholders: \
1. Project Title: The name of the project.\
2. Description: A brief overview of the project's purpose, features, and key functionalities.\
3. Configuration: Information on any configuration files or environment variables required.\
4. Installation: Step-by-step instructions on how to install and set up the project, including any dependencies.\
5. Usage: Examples of how to use the project, including any command-line instructions or code snippets. Indicates main function or entry of the program.\
6. Output: The expected output position and data formats of the output.\
7. Contact Information: How to reach the maintainers or developers for support or inquiries.\
Ensure that the README is clear, well-organized, and helpful for both new users and contributors.";

/// Single system message asking for the final requirements list.
#[must_use]
pub fn requirements_messages<S: AsRef<str>>(imports: &[S], snapshot: &[String]) -> Vec<Message> {
    let imports = imports.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("\n");
    let snapshot = snapshot.join("\n");
    let instruction = format!(
        "{REQUIREMENTS_INSTRUCTION}```python\n{imports}\n```\n\
         Existing `requirements.txt` content:\n```\n{snapshot}\n```\n{REQUIREMENTS_OUTPUT_FORM}"
    );
    vec![Message::system(instruction)]
}

/// Instruction plus the file's text as the user message.
#[must_use]
pub fn description_messages(content: &str, language: Language) -> Vec<Message> {
    vec![
        Message::system(format!("{DESCRIPTION_INSTRUCTION}{}", language.instruction_suffix())),
        Message::user(content),
    ]
}

/// Instruction plus project metadata and every gathered artifact as `(title, content)`.
#[must_use]
pub fn readme_messages(config: &ProjectConfig, inputs: &[(String, String)]) -> Vec<Message> {
    let mut query = format!(
        "The information of this project is as follows:\n\
         project_name: {}\n\
         project_author: {}\n\
         project_author_info: {}\n\
         project_short_description: {}\n",
        config.project_name,
        config.author,
        config.author_info.as_deref().unwrap_or("<>"),
        config.description.as_deref().unwrap_or("<>"),
    );
    for (title, content) in inputs {
        query.push_str(&format!("\n\n{title}:\n{content}"));
    }
    vec![
        Message::system(format!("{README_INSTRUCTION}{}", config.language.instruction_suffix())),
        Message::user(query),
    ]
}
