//! Shell completion generation for asr-export
//!
//! Scripts come from clap_complete. For bash and fish the quick filter and
//! format names are appended so `--quick-filter <TAB>` offers them.

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::CliArgs;
use crate::error::{AsrError, Result};
use crate::export::ExportFormat;
use crate::filter::QuickFilter;

const BIN_NAME: &str = "asr-export";

/// Generate a completion script
///
/// # Arguments
/// * `shell` - Target shell
///
/// # Returns
/// * `Result<String>` - Script text
pub fn generate_completion(shell: Shell) -> Result<String> {
    let mut cmd = CliArgs::command();
    let mut buffer = Vec::new();
    generate(shell, &mut cmd, BIN_NAME, &mut buffer);

    let basic = String::from_utf8(buffer).map_err(|e| {
        AsrError::Generic(format!("Completion script is not UTF-8: {}", e))
    })?;

    Ok(match shell {
        Shell::Bash => format!("{}{}", basic, bash_value_completion()),
        Shell::Fish => format!("{}{}", basic, fish_value_completion()),
        _ => basic,
    })
}

fn quick_filter_names() -> String {
    QuickFilter::ALL
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_names() -> String {
    [ExportFormat::Csv, ExportFormat::Json]
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn bash_value_completion() -> String {
    format!(
        r#"
# Value completion for filter and format flags
_asr_export_enhanced() {{
    local cur prev
    cur="${{COMP_WORDS[COMP_CWORD]}}"
    prev="${{COMP_WORDS[COMP_CWORD-1]}}"

    case "$prev" in
        --quick-filter)
            COMPREPLY=($(compgen -W "{quick}" -- "$cur"))
            return 0
            ;;
        -f|--format)
            COMPREPLY=($(compgen -W "{formats}" -- "$cur"))
            return 0
            ;;
    esac

    _asr-export "$@"
}}

complete -F _asr_export_enhanced -o bashdefault -o default asr-export
"#,
        quick = quick_filter_names(),
        formats = format_names(),
    )
}

fn fish_value_completion() -> String {
    format!(
        r#"
# Value completion for filter and format flags
complete -c asr-export -l quick-filter -f -a "{quick}" -d "Quick filter"
complete -c asr-export -s f -l format -f -a "{formats}" -d "Export format"
"#,
        quick = quick_filter_names(),
        formats = format_names(),
    )
}
