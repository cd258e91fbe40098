use log::info;
use std::collections::HashMap;
use std::sync::Arc;

use super::bank_errors::BankError;
use super::bank_traits::BankGateway;

/// Maps partner-bank codes to their gateway adapters.
pub struct GatewayRegistry {
    gateways: HashMap<String, Arc<dyn BankGateway>>,
}

impl GatewayRegistry {
    pub fn new() -> Self {
        Self {
            gateways: HashMap::new(),
        }
    }

    pub fn register(&mut self, bank_code: impl Into<String>, gateway: Arc<dyn BankGateway>) {
        let bank_code = bank_code.into();
        info!("Registering bank gateway for '{}'", bank_code);
        self.gateways.insert(bank_code, gateway);
    }

    pub fn for_bank(&self, bank_code: &str) -> Result<Arc<dyn BankGateway>, BankError> {
        self.gateways
            .get(bank_code)
            .cloned()
            .ok_or_else(|| BankError::UnknownBank(bank_code.to_string()))
    }

    pub fn bank_codes(&self) -> Vec<String> {
        self.gateways.keys().cloned().collect()
    }
}

impl Default for GatewayRegistry {
    fn default() -> Self {
        Self::new()
    }
}
