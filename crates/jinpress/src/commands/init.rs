//! `init` command: scaffold a new documentation project.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::error::CliError;
use crate::output::Output;

const DEFAULT_CONFIG: &str = r#"site:
  title: "{title}"
  description: "A JinPress documentation site"
  lang: "en"
  base: "/"

theme:
  nav:
    - text: "Home"
      link: "/"
    - text: "Guide"
      link: "/guide/getting-started/"
  sidebar:
    "/guide/":
      - text: "Getting Started"
        link: "/guide/getting-started/"
  footer:
    message: "Built with JinPress"
"#;

const INDEX_MD: &str = r#"---
title: "Home"
---

# {title}

Welcome to your new documentation site.

Start the dev server with live reload:

```bash
jinpress serve
```

Then edit the files under `docs/` and watch the browser refresh.
"#;

const GETTING_STARTED_MD: &str = r#"---
title: "Getting Started"
---

# Getting Started

Pages are plain Markdown files under `docs/`. Each file becomes a page
with a clean URL: `docs/guide/getting-started.md` is served at
`/guide/getting-started/`.

## Custom containers

::: tip
Use containers to call out important information.
:::

::: warning Heads up
Containers accept a custom title after the type.
:::

## Configuration

Site settings live in `jinpress.yml` at the project root. Navigation
and sidebar entries are configured under the `theme` section.
"#;

const GITIGNORE: &str = "dist/\n";

/// Arguments for the `init` command.
#[derive(Args)]
pub(crate) struct InitArgs {
    /// Name of the new project (prompted for if omitted).
    name: Option<String>,

    /// Directory to create the project in (defaults to the project name).
    #[arg(long)]
    dir: Option<PathBuf>,
}

impl InitArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let name = match self.name {
            Some(name) => name,
            None => {
                let entered = output.prompt("Project name: ")?;
                let entered = entered.trim().to_owned();
                if entered.is_empty() {
                    return Err(CliError::Validation(
                        "Project name cannot be empty".to_owned(),
                    ));
                }
                entered
            }
        };

        let target = self.dir.unwrap_or_else(|| PathBuf::from(&name));
        if target.exists() {
            return Err(CliError::Validation(format!(
                "Directory already exists: {}",
                target.display()
            )));
        }

        fs::create_dir_all(target.join("docs/guide"))?;
        fs::create_dir_all(target.join("static"))?;
        fs::create_dir_all(target.join("templates"))?;

        fs::write(
            target.join("jinpress.yml"),
            DEFAULT_CONFIG.replace("{title}", &name),
        )?;
        fs::write(
            target.join("docs/index.md"),
            INDEX_MD.replace("{title}", &name),
        )?;
        fs::write(
            target.join("docs/guide/getting-started.md"),
            GETTING_STARTED_MD,
        )?;
        fs::write(target.join(".gitignore"), GITIGNORE)?;

        output.success(&format!("Created project '{name}'"));
        output.info("");
        output.info("Next steps:");
        output.highlight(&format!("  cd {}", target.display()));
        output.highlight("  jinpress serve");

        Ok(())
    }
}
