/// Failure to bring an effect up on its target.
///
/// Hosts log these and carry on without the effect; nothing is surfaced to
/// the page.
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("failed to create the {effect} surface: {source:#}")]
    Surface {
        effect: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl MountError {
    pub fn surface(effect: &'static str, source: anyhow::Error) -> Self {
        MountError::Surface { effect, source }
    }
}
