#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

pub struct SlashCommand {
    command: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let mut args = text
            .split_whitespace()
            .map(|e| return e.to_string())
            .collect::<Vec<String>>();
        if args.is_empty() {
            return None;
        }
        let prefix = args.remove(0);

        let cmd = SlashCommand {
            command: prefix,
            args,
        };
        if cmd.is_quit()
            || cmd.is_help()
            || cmd.is_page()
            || cmd.is_step()
            || cmd.is_patient()
            || cmd.is_context()
            || cmd.is_prompt()
            || cmd.is_suggest()
            || cmd.is_cancel()
            || cmd.is_clear()
        {
            return Some(cmd);
        }

        return None;
    }

    /// First argument, if any.
    pub fn arg(&self) -> Option<&str> {
        return self.args.first().map(|e| return e.as_str());
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }

    pub fn is_page(&self) -> bool {
        return ["/p", "/page"].contains(&self.command.as_str());
    }

    pub fn is_step(&self) -> bool {
        return ["/st", "/step"].contains(&self.command.as_str());
    }

    pub fn is_patient(&self) -> bool {
        return ["/pt", "/patient"].contains(&self.command.as_str());
    }

    pub fn is_context(&self) -> bool {
        return ["/ctx", "/context"].contains(&self.command.as_str());
    }

    pub fn is_prompt(&self) -> bool {
        return ["/prompt"].contains(&self.command.as_str());
    }

    pub fn is_suggest(&self) -> bool {
        return ["/s", "/suggest"].contains(&self.command.as_str());
    }

    pub fn is_cancel(&self) -> bool {
        return ["/cancel"].contains(&self.command.as_str());
    }

    pub fn is_clear(&self) -> bool {
        return ["/clear"].contains(&self.command.as_str());
    }
}
