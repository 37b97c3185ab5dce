use std::path::Path;

/// Target survey data dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SurveyFormat {
    /// Survex `.swx`: `;` comments, `*` commands.
    #[default]
    Survex,
    /// Therion centerline `.th`: `#` comments, bare commands, wrapped in a
    /// `survey surface` / `centerline` block.
    Therion,
}

impl SurveyFormat {
    pub fn comment_prefix(self) -> &'static str {
        match self {
            SurveyFormat::Survex => ";",
            SurveyFormat::Therion => "#",
        }
    }

    pub fn command_prefix(self) -> &'static str {
        match self {
            SurveyFormat::Survex => "*",
            SurveyFormat::Therion => "",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            SurveyFormat::Survex => "swx",
            SurveyFormat::Therion => "th",
        }
    }

    /// Format implied by an output file name, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("th") => Some(SurveyFormat::Therion),
            _ => None,
        }
    }

    /// Default output path: the input path with the format's extension appended.
    pub fn output_path_for(self, input: &Path) -> std::path::PathBuf {
        let mut name = input.as_os_str().to_owned();
        name.push(".");
        name.push(self.extension());
        name.into()
    }
}
