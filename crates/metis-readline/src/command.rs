//! REPL command parsing.

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: a message for the open conversation
    Send(String),
    Stop,
    Edit { message_id: String, text: String },
    History,
    Chats,
    Open(String),
    New,
    Rename { chat_id: String, title: String },
    Projects,
    Project {
        project_id: String,
        sub_conversation_id: Option<String>,
    },
    NewProject { agent_ids: Vec<String>, name: String },
    AddAgents {
        project_id: String,
        agent_ids: Vec<String>,
    },
    Role {
        project_id: String,
        agent_id: String,
        role: String,
    },
    Help,
    Quit,
    /// A slash command with missing or malformed arguments
    Usage(&'static str),
    Unknown(String),
}

/// Every command, with its usage line.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/stop", "/stop"),
    ("/edit", "/edit <message-id> <new text>"),
    ("/history", "/history"),
    ("/chats", "/chats"),
    ("/open", "/open <chat-id>"),
    ("/new", "/new"),
    ("/rename", "/rename <chat-id> <title>"),
    ("/projects", "/projects"),
    ("/project", "/project <project-id> [sub-conversation-id]"),
    ("/newproject", "/newproject <agent,agent,...> <name>"),
    ("/addagents", "/addagents <project-id> <agent,agent,...>"),
    ("/role", "/role <project-id> <agent-id> <role text>"),
    ("/help", "/help"),
];

fn usage(command: &str) -> &'static str {
    COMMANDS
        .iter()
        .find(|(name, _)| *name == command)
        .map(|(_, usage)| *usage)
        .unwrap_or("/help")
}

fn split_ids(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Parses a line. Returns `None` for blank input.
pub fn parse(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if line == "quit" || line == "exit" {
        return Some(Command::Quit);
    }
    if !line.starts_with('/') {
        return Some(Command::Send(line.to_string()));
    }

    let (name, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    let mut words = rest.splitn(3, ' ').filter(|w| !w.is_empty());

    let command = match name {
        "/stop" => Command::Stop,
        "/history" => Command::History,
        "/chats" => Command::Chats,
        "/new" => Command::New,
        "/projects" => Command::Projects,
        "/help" => Command::Help,
        "/edit" => match rest.split_once(' ') {
            Some((id, text)) if !text.trim().is_empty() => Command::Edit {
                message_id: id.to_string(),
                text: text.trim().to_string(),
            },
            _ => Command::Usage(usage(name)),
        },
        "/open" => match words.next() {
            Some(id) => Command::Open(id.to_string()),
            None => Command::Usage(usage(name)),
        },
        "/rename" => match rest.split_once(' ') {
            Some((id, title)) if !title.trim().is_empty() => Command::Rename {
                chat_id: id.to_string(),
                title: title.trim().to_string(),
            },
            _ => Command::Usage(usage(name)),
        },
        "/project" => match words.next() {
            Some(id) => Command::Project {
                project_id: id.to_string(),
                sub_conversation_id: words.next().map(str::to_string),
            },
            None => Command::Usage(usage(name)),
        },
        "/newproject" => match rest.split_once(' ') {
            Some((agents, title)) if !title.trim().is_empty() => Command::NewProject {
                agent_ids: split_ids(agents),
                name: title.trim().to_string(),
            },
            _ => Command::Usage(usage(name)),
        },
        "/addagents" => match (words.next(), words.next()) {
            (Some(project_id), Some(agents)) => Command::AddAgents {
                project_id: project_id.to_string(),
                agent_ids: split_ids(agents),
            },
            _ => Command::Usage(usage(name)),
        },
        "/role" => match (words.next(), words.next(), words.next()) {
            (Some(project_id), Some(agent_id), Some(role)) => Command::Role {
                project_id: project_id.to_string(),
                agent_id: agent_id.to_lowercase(),
                role: role.trim().to_string(),
            },
            _ => Command::Usage(usage(name)),
        },
        other => Command::Unknown(other.to_string()),
    };
    Some(command)
}
