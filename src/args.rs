use std::error::Error;

pub struct ArgParser {
    iter: std::vec::IntoIter<String>,
    command_name: String,
}

impl ArgParser {
    pub fn new(args: Vec<String>, command_name: &str) -> Self {
        Self { iter: args.into_iter(), command_name: command_name.to_string() }
    }

    /// Extract a string value for a flag
    pub fn extract_value(
        &mut self,
        flag: &str,
    ) -> Result<String, Box<dyn Error>> {
        self.iter.next().ok_or_else(|| {
            format!("Provide a value after {} for {}", flag, self.command_name)
                .into()
        })
    }

    /// Next positional argument parsed as an item order
    pub fn extract_order(&mut self, what: &str) -> Result<u32, Box<dyn Error>> {
        let raw = self.iter.next().ok_or_else(|| {
            format!("Provide the {what} order for {}", self.command_name)
        })?;
        parse_order(&raw)
    }

    pub fn has_more(&self) -> bool {
        self.iter.len() > 0
    }

    /// Get next positional argument
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<String> {
        self.iter.next()
    }

    /// Collect remaining args
    pub fn collect_remaining(self) -> Vec<String> {
        self.iter.collect()
    }

    /// Fail on anything left over
    pub fn finish(mut self) -> Result<(), Box<dyn Error>> {
        match self.iter.next() {
            Some(extra) => Err(format!(
                "Unexpected argument for {}: {extra}",
                self.command_name
            )
            .into()),
            None => Ok(()),
        }
    }
}

pub fn parse_order(raw: &str) -> Result<u32, Box<dyn Error>> {
    raw.trim()
        .trim_start_matches('#')
        .parse()
        .map_err(|_| format!("Order must be a non-negative number, got `{raw}`").into())
}
