//! Built-in résumé styles — the LaTeX document shells and section snippets.
//!
//! A style contributes the preamble and overall page shape; the section
//! snippets are shared across styles and only reference the `\resumesection`
//! command each shell defines. Templates must never contain a literal `{{`
//! outside a placeholder, so brace-adjacent constructs (e.g. `\href` with a
//! substituted target) are assembled in the context layer instead.

use serde::{Deserialize, Serialize};

use crate::models::resume::Section;

// ────────────────────────────────────────────────────────────────────────────
// Style and font size selection
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateStyle {
    #[default]
    Classic,
    Compact,
}

impl TemplateStyle {
    pub fn shell(&self) -> &'static str {
        match self {
            TemplateStyle::Classic => CLASSIC_SHELL,
            TemplateStyle::Compact => COMPACT_SHELL,
        }
    }
}

/// Base font size for the document class. Serialized as the LaTeX option
/// string ("10pt") so request payloads read naturally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontSize {
    #[default]
    #[serde(rename = "10pt")]
    TenPt,
    #[serde(rename = "11pt")]
    ElevenPt,
    #[serde(rename = "12pt")]
    TwelvePt,
}

impl FontSize {
    pub fn as_latex(&self) -> &'static str {
        match self {
            FontSize::TenPt => "10pt",
            FontSize::ElevenPt => "11pt",
            FontSize::TwelvePt => "12pt",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document shells
// ────────────────────────────────────────────────────────────────────────────

pub const CLASSIC_SHELL: &str = r"\documentclass[{{font_size}},letterpaper]{article}
\usepackage[margin=0.7in]{geometry}
\usepackage{enumitem}
\usepackage[hidelinks]{hyperref}
\setlist[itemize]{leftmargin=1.2em,itemsep=1pt,parsep=0pt,topsep=2pt}
\setlength{\parindent}{0pt}
\newcommand{\resumesection}[1]{\vspace{8pt}{\large\bfseries #1}\par\vspace{2pt}\hrule\vspace{6pt}}
\pagestyle{empty}
{{extra_preamble?}}
\begin{document}
\begin{center}
{\LARGE\bfseries {{name}}}\\[4pt]
{{contact_line}}
\end{center}
{{body}}
\end{document}
";

pub const COMPACT_SHELL: &str = r"\documentclass[{{font_size}},letterpaper]{article}
\usepackage[margin=0.5in]{geometry}
\usepackage{enumitem}
\usepackage[hidelinks]{hyperref}
\setlist[itemize]{leftmargin=1em,itemsep=0pt,parsep=0pt,topsep=1pt}
\setlength{\parindent}{0pt}
\renewcommand{\baselinestretch}{0.96}
\newcommand{\resumesection}[1]{\vspace{5pt}{\normalsize\bfseries\scshape #1}\par\vspace{3pt}}
\pagestyle{empty}
{{extra_preamble?}}
\begin{document}
\begin{center}
{\Large\bfseries {{name}}}\\[2pt]
{{contact_line}}
\end{center}
{{body}}
\end{document}
";

/// Footer preamble enabled for multi-page résumés. `\pageref{LastPage}` is
/// the canonical forward reference that needs a second compiler pass.
pub const MULTI_PAGE_PREAMBLE: &str = r"\usepackage{fancyhdr}
\usepackage{lastpage}
\fancyhf{}
\renewcommand{\headrulewidth}{0pt}
\fancyfoot[C]{\small Page \thepage\ of \pageref{LastPage}}
\pagestyle{fancy}";

// ────────────────────────────────────────────────────────────────────────────
// Section snippets
// ────────────────────────────────────────────────────────────────────────────

pub const SUMMARY_SNIPPET: &str = r"{{text}}
";

pub const EXPERIENCE_SNIPPET: &str = r"{{#each entries}}
{\bfseries {{role}}} \hfill {{dates?}}\par
{\itshape {{company}}}{{location_suffix?}}\par
{{bullet_list?}}
\vspace{4pt}
{{/each}}
";

pub const PROJECTS_SNIPPET: &str = r"{{#each entries}}
{\bfseries {{name}}}{{tech_suffix?}}{{link_suffix?}}\par
{{description}}\par
\vspace{4pt}
{{/each}}
";

pub const EDUCATION_SNIPPET: &str = r"{{#each entries}}
{\bfseries {{institution}}} \hfill {{dates?}}\par
{{degree}}{{location_suffix?}}\par
{{detail_list?}}
\vspace{4pt}
{{/each}}
";

pub const SKILLS_SNIPPET: &str = r"{{#each groups}}
{\bfseries {{category}}:} {{items}}\par
{{/each}}
";

pub fn section_snippet(section: &Section) -> &'static str {
    match section {
        Section::Summary { .. } => SUMMARY_SNIPPET,
        Section::Experience { .. } => EXPERIENCE_SNIPPET,
        Section::Projects { .. } => PROJECTS_SNIPPET,
        Section::Education { .. } => EDUCATION_SNIPPET,
        Section::Skills { .. } => SKILLS_SNIPPET,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
