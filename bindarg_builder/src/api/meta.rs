/// Parser-level metadata, rendered by the command line engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserMeta {
    /// The program name.
    pub prog: Option<String>,
    /// The description shown above the options.
    pub about: Option<String>,
    /// The text shown below the options.
    pub epilog: Option<String>,
    /// A replacement for the generated usage line.
    pub usage: Option<String>,
}

impl ParserMeta {
    /// Overlay every setting present in `other`.
    pub fn merge(&mut self, other: ParserMeta) {
        let ParserMeta {
            prog,
            about,
            epilog,
            usage,
        } = other;

        if prog.is_some() {
            self.prog = prog;
        }
        if about.is_some() {
            self.about = about;
        }
        if epilog.is_some() {
            self.epilog = epilog;
        }
        if usage.is_some() {
            self.usage = usage;
        }
    }
}
