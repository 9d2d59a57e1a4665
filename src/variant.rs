//! Generator variants: a closed set dispatched through one template table.

use std::path::Path;

use regex::Regex;

use crate::GenError;

/// File-name convention: `<name>.<variant>.ts`.
const FILE_PATTERN: &str = r"\.(component|service|pipe|guard)\.ts$";

// ─── Variant ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Component,
    Service,
    Pipe,
    Guard,
    /// Undecorated class in a plain `.ts` file.
    Class,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Service => "service",
            Self::Pipe => "pipe",
            Self::Guard => "guard",
            Self::Class => "class",
        }
    }

    /// Row of the template table for this variant.
    pub fn template(&self) -> &'static VariantTemplate {
        match self {
            Self::Component => &COMPONENT,
            Self::Service => &SERVICE,
            Self::Pipe => &PIPE,
            Self::Guard => &GUARD,
            Self::Class => &CLASS,
        }
    }

    /// Select the variant from the file-name convention.
    pub fn from_path(path: &Path) -> Result<Self, GenError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let re = Regex::new(FILE_PATTERN).map_err(|source| GenError::InvalidRegex {
            pattern: FILE_PATTERN.to_string(),
            source,
        })?;
        if let Some(caps) = re.captures(&name) {
            return caps[1].parse().map_err(|_| GenError::UnsupportedFile(name.clone()));
        }
        if name.ends_with(".ts") && !name.ends_with(".d.ts") && !name.ends_with(".spec.ts") {
            return Ok(Self::Class);
        }
        Err(GenError::UnsupportedFile(name))
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "component" => Ok(Self::Component),
            "service" => Ok(Self::Service),
            "pipe" => Ok(Self::Pipe),
            "guard" => Ok(Self::Guard),
            "class" => Ok(Self::Class),
            other => Err(format!(
                "Unknown variant '{}'. Expected one of: component, service, pipe, guard, class",
                other
            )),
        }
    }
}

// ─── Template table ─────────────────────────────────────────────────

/// Environment setup (`TestBed.configureTestingModule`) shape.
#[derive(Debug)]
pub struct SetupTemplate {
    /// `async` + `compileComponents()`.
    pub compiles: bool,
    pub imports: &'static [&'static str],
    /// Class goes into `declarations` (components) instead of `providers`.
    pub declares_class: bool,
    pub schemas: &'static [&'static str],
}

/// Per-variant templates. Placeholders: `{class}`, `{var}`, `{args}`.
#[derive(Debug)]
pub struct VariantTemplate {
    pub decorator: Option<&'static str>,
    /// Name of the instance under test in generated code.
    pub var_name: &'static str,
    pub state_vars: &'static [&'static str],
    pub setup: Option<SetupTemplate>,
    pub init: &'static [&'static str],
}

impl VariantTemplate {
    pub fn uses_setup_block(&self) -> bool {
        self.setup.is_some()
    }
}

static COMPONENT: VariantTemplate = VariantTemplate {
    decorator: Some("Component"),
    var_name: "component",
    state_vars: &["let fixture: ComponentFixture<{class}>;", "let {var}: {class};"],
    setup: Some(SetupTemplate {
        compiles: true,
        imports: &["FormsModule", "ReactiveFormsModule"],
        declares_class: true,
        schemas: &["CUSTOM_ELEMENTS_SCHEMA", "NO_ERRORS_SCHEMA"],
    }),
    init: &[
        "fixture = TestBed.createComponent({class});",
        "{var} = fixture.componentInstance;",
        "fixture.detectChanges();",
    ],
};

static SERVICE: VariantTemplate = VariantTemplate {
    decorator: Some("Injectable"),
    var_name: "service",
    state_vars: &["let {var}: {class};"],
    setup: Some(SetupTemplate {
        compiles: false,
        imports: &[],
        declares_class: false,
        schemas: &[],
    }),
    init: &["{var} = TestBed.inject({class});"],
};

static GUARD: VariantTemplate = VariantTemplate {
    decorator: Some("Injectable"),
    var_name: "guard",
    state_vars: &["let {var}: {class};"],
    setup: Some(SetupTemplate {
        compiles: false,
        imports: &[],
        declares_class: false,
        schemas: &[],
    }),
    init: &["{var} = TestBed.inject({class});"],
};

static PIPE: VariantTemplate = VariantTemplate {
    decorator: Some("Pipe"),
    var_name: "pipe",
    state_vars: &["let {var}: {class};"],
    setup: None,
    init: &["{var} = new {class}({args});"],
};

static CLASS: VariantTemplate = VariantTemplate {
    decorator: None,
    var_name: "instance",
    state_vars: &["let {var}: {class};"],
    setup: None,
    init: &["{var} = new {class}({args});"],
};
