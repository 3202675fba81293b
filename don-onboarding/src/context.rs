// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::config::OnboardingConfig;
use don_api_exports::RegistrarService;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// What every node operation needs besides the node itself
#[derive(Clone)]
pub struct OnboardingContext {
    /// registrar the nodes are onboarded to
    pub registrar: Arc<dyn RegistrarService>,
    /// onboarding settings
    pub config: OnboardingConfig,
    /// cooperative cancellation, observed between remote calls
    pub stop: CancellationToken,
}

impl OnboardingContext {
    /// context with a fresh stop token
    pub fn new(registrar: Arc<dyn RegistrarService>, config: OnboardingConfig) -> Self {
        OnboardingContext {
            registrar,
            config,
            stop: CancellationToken::new(),
        }
    }
}
