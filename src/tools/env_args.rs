#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;
#[cfg(not(test))]
use std::env;
use std::str::FromStr;

/// A value the app can be configured with.
/// It is first looked up among the args passed to the app (`--name=value`),
/// then among the environment variables when a fallback variable is declared.
#[derive(Debug, Clone, Copy)]
pub struct Setting<'a> {
    arg_name: &'a str,
    env_var: Option<&'a str>,
}

impl<'a> Setting<'a> {
    pub const fn arg(arg_name: &'a str) -> Self {
        Self {
            arg_name,
            env_var: None,
        }
    }

    pub const fn arg_or_env(arg_name: &'a str, env_var: &'a str) -> Self {
        Self {
            arg_name,
            env_var: Some(env_var),
        }
    }
}

/// Retrieve value associated to an arg passed to the app.
/// Empty values are considered missing.
///
/// /!\ As this works on global variables,
/// a function using `retrieve_arg_value` could be tricky to test.
/// To do so, wrap your test with `with_env_args(args, fn)`.
/// This function is only available in a test context.
pub fn retrieve_arg_value(arg_name: &str) -> Option<String> {
    let arg_prefix = format!("{arg_name}=");
    get_env_args()
        .into_iter()
        .find(|arg| arg.starts_with(&arg_prefix))
        .and_then(|arg| arg.split_once('=').map(|(_, value)| value.to_owned()))
        .filter(|value| !value.is_empty())
}

/// Retrieve a setting from the args, or from its fallback environment variable.
pub fn retrieve_setting(setting: Setting) -> Option<String> {
    retrieve_arg_value(setting.arg_name).or_else(|| {
        setting
            .env_var
            .and_then(get_env_var)
            .filter(|value| !value.is_empty())
    })
}

/// Retrieve a setting that the app can't work without.
pub fn retrieve_expected_setting<E>(setting: Setting, error_if_missing: E) -> Result<String, E> {
    retrieve_setting(setting).ok_or(error_if_missing)
}

/// Retrieve a setting and parse it.
/// A value that can't be parsed is logged and ignored.
pub fn retrieve_parsed_setting<T: FromStr>(setting: Setting) -> Option<T> {
    retrieve_setting(setting).and_then(|value| match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(
                "Ignoring invalid value `{value}` for `{}`",
                setting.arg_name
            );
            None
        }
    })
}

#[cfg(not(test))]
fn get_env_args() -> Vec<String> {
    env::args().collect()
}

#[cfg(not(test))]
fn get_env_var(name: &str) -> Option<String> {
    env::var(name).ok()
}

#[cfg(test)]
thread_local! {
    /// A mutable `Vec<String>` to host env args for tests.
    /// When a test is run with `with_env_args`,
    /// the inner `Vec` is set to whatever param is passed.
    /// It is then reset to its previous state.
    static ENV_ARGS: RefCell<Vec<String>> = const { RefCell::new(vec![]) };

    /// Same as `ENV_ARGS`, for environment variables set with `with_env_vars`.
    static ENV_VARS: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
}

#[cfg(test)]
fn get_env_args() -> Vec<String> {
    ENV_ARGS.with(|vec| vec.borrow().clone())
}

#[cfg(test)]
fn get_env_var(name: &str) -> Option<String> {
    ENV_VARS.with(|map| map.borrow().get(name).cloned())
}

#[cfg(test)]
/// When running tests, env args are extended from within the app.
/// You can set them up from there by wrapping your test with this function.
pub fn with_env_args<F, T>(mut args: Vec<String>, function: F) -> T
where
    F: FnOnce() -> T,
{
    ENV_ARGS.with(|refcell| {
        let global_env_args = std::env::args().collect::<Vec<String>>();
        args.extend_from_slice(&global_env_args);
        let old_value = refcell.replace(args);
        let result = function();
        refcell.replace(old_value);
        result
    })
}

#[cfg(test)]
/// When running tests, env vars are not read from the process.
/// Wrap your test with this function to declare them.
pub fn with_env_vars<F, T>(vars: Vec<(&str, &str)>, function: F) -> T
where
    F: FnOnce() -> T,
{
    ENV_VARS.with(|refcell| {
        let vars = vars
            .into_iter()
            .map(|(name, value)| (name.to_owned(), value.to_owned()))
            .collect();
        let old_value = refcell.replace(vars);
        let result = function();
        refcell.replace(old_value);
        result
    })
}
