//! Shell integration scripts.
//!
//! The scripts keep the measurement state in shell variables: the start
//! timestamp is stamped by `cmdtime now` in the pre-exec hook and handed to
//! `cmdtime finish` from the pre-prompt hook, whose output is `eval`ed to
//! export the `CMDTIME_*` variables. Overhead is calibrated once per shell
//! with `cmdtime calibrate --spawn`, which pays the same process-spawn cost.

use clap::ValueEnum;
use cmdtime_core::vars::shell_quote;
use cmdtime_core::{Config, CoreError};
use indoc::indoc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum HookShell {
    Bash,
    Zsh,
}

const BASH_HOOK: &str = indoc! {r#"
    # cmdtime integration for bash: eval "$(cmdtime init bash)"
    __cmdtime_bin=__CMDTIME_EXE__
    __cmdtime_overhead="$("$__cmdtime_bin" calibrate --spawn 2>/dev/null || echo 0)"
    __cmdtime_start=0
    __cmdtime_armed=

    __cmdtime_preexec() {
        # DEBUG fires for every simple command, including our own prompt
        # hooks. Only the first command typed after a prompt is timed.
        [[ -n "$__cmdtime_armed" ]] || return 0
        [[ -n "${COMP_LINE-}" ]] && return 0
        __cmdtime_armed=
        # An empty line goes straight to PROMPT_COMMAND.
        case "$1" in
            __cmdtime_precmd | __cmdtime_arm) return 0 ;;
        esac
        if [[ "$1" == __CMDTIME_BYPASS__ ]]; then
            __cmdtime_start=0
        else
            __cmdtime_start="$("$__cmdtime_bin" now)"
        fi
    }

    __cmdtime_precmd() {
        local status=$? stop
        stop="$("$__cmdtime_bin" now)"
        eval "$("$__cmdtime_bin" finish --start "${__cmdtime_start:-0}" --stop "$stop" --overhead "${__cmdtime_overhead:-0}")"
        __cmdtime_start=0
        return "$status"
    }

    __cmdtime_arm() {
        local status=$?
        __cmdtime_armed=1
        return "$status"
    }

    __CMDTIME_BYPASS_FN__() {
        [[ -n "${CMDTIME_STRING-}" ]] && printf 'real %ss\n' "$CMDTIME_STRING"
        return 0
    }

    trap '__cmdtime_preexec "$BASH_COMMAND"' DEBUG
    PROMPT_COMMAND="__cmdtime_precmd${PROMPT_COMMAND:+; $PROMPT_COMMAND}; __cmdtime_arm"
"#};

const ZSH_HOOK: &str = indoc! {r#"
    # cmdtime integration for zsh: eval "$(cmdtime init zsh)"
    __cmdtime_bin=__CMDTIME_EXE__
    __cmdtime_overhead="$("$__cmdtime_bin" calibrate --spawn 2>/dev/null || echo 0)"
    __cmdtime_start=0

    __cmdtime_preexec() {
        setopt localoptions extendedglob
        local line=${${1##[[:space:]]##}%%[[:space:]]##}
        if [[ "$line" == __CMDTIME_BYPASS__ ]]; then
            __cmdtime_start=0
        else
            __cmdtime_start="$("$__cmdtime_bin" now)"
        fi
    }

    __cmdtime_precmd() {
        local stop
        stop="$("$__cmdtime_bin" now)"
        eval "$("$__cmdtime_bin" finish --start "${__cmdtime_start:-0}" --stop "$stop" --overhead "${__cmdtime_overhead:-0}")"
        __cmdtime_start=0
    }

    __CMDTIME_BYPASS_FN__() {
        [[ -n "${CMDTIME_STRING-}" ]] && printf 'real %ss\n' "$CMDTIME_STRING"
        return 0
    }

    autoload -Uz add-zsh-hook
    add-zsh-hook preexec __cmdtime_preexec
    add-zsh-hook precmd __cmdtime_precmd
"#};

/// Fill in the executable path and bypass command name.
pub fn render(shell: HookShell, exe: &str, bypass: &str) -> String {
    let template = match shell {
        HookShell::Bash => BASH_HOOK,
        HookShell::Zsh => ZSH_HOOK,
    };
    template
        .replace("__CMDTIME_EXE__", &shell_quote(exe))
        .replace("__CMDTIME_BYPASS_FN__", bypass)
        .replace("__CMDTIME_BYPASS__", &shell_quote(bypass))
}

pub fn run(shell: HookShell) -> Result<(), CoreError> {
    let exe = std::env::current_exe()?;
    let config = Config::load_or_default();
    let bypass = config.settings().bypass_command;
    if !bypass
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(CoreError::Custom(format!(
            "bypass command '{bypass}' is not a valid shell function name"
        )));
    }
    print!("{}", render(shell, &exe.display().to_string(), &bypass));
    Ok(())
}
