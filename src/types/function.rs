// ABOUTME: Catalogue of the six connector functions exposed to Snowflake.
// ABOUTME: Derives Lambda names, external function names, aliases, and SQL signatures.

use serde::Serialize;
use std::fmt;

/// Prefix shared by every managed Lambda function.
pub const LAMBDA_NAME_PREFIX: &str = "venafi-snowflake-func-";

/// One certificate (machine identity) operation, deployed once as a Lambda
/// function and once per Snowflake account as an external function plus alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ConnectorFunction {
    GetMachineId,
    RequestMachineId,
    ListMachineIds,
    RenewMachineId,
    RevokeMachineId,
    GetMachineIdStatus,
}

impl ConnectorFunction {
    /// Every function, in deployment order.
    pub const ALL: [ConnectorFunction; 6] = [
        ConnectorFunction::GetMachineId,
        ConnectorFunction::RequestMachineId,
        ConnectorFunction::ListMachineIds,
        ConnectorFunction::RenewMachineId,
        ConnectorFunction::RevokeMachineId,
        ConnectorFunction::GetMachineIdStatus,
    ];

    /// Position in [`ConnectorFunction::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lambda name suffix, gateway path part, and handler name.
    pub fn suffix(self) -> &'static str {
        match self {
            ConnectorFunction::GetMachineId => "getmachineid",
            ConnectorFunction::RequestMachineId => "requestmachineid",
            ConnectorFunction::ListMachineIds => "listmachineids",
            ConnectorFunction::RenewMachineId => "renewmachineid",
            ConnectorFunction::RevokeMachineId => "revokemachineid",
            ConnectorFunction::GetMachineIdStatus => "getmachineidstatus",
        }
    }

    /// Full Lambda function name.
    pub fn lambda_name(self) -> String {
        format!("{}{}", LAMBDA_NAME_PREFIX, self.suffix())
    }

    /// Snowflake external function name.
    pub fn sql_name(self) -> &'static str {
        match self {
            ConnectorFunction::GetMachineId => "GET_MACHINE_ID",
            ConnectorFunction::RequestMachineId => "REQUEST_MACHINE_ID",
            ConnectorFunction::ListMachineIds => "LIST_MACHINE_IDS",
            ConnectorFunction::RenewMachineId => "RENEW_MACHINE_ID",
            ConnectorFunction::RevokeMachineId => "REVOKE_MACHINE_ID",
            ConnectorFunction::GetMachineIdStatus => "GET_MACHINE_ID_STATUS",
        }
    }

    /// Short alias created next to the external function.
    pub fn sql_alias(self) -> &'static str {
        match self {
            ConnectorFunction::GetMachineId => "GET_MID",
            ConnectorFunction::RequestMachineId => "REQUEST_MID",
            ConnectorFunction::ListMachineIds => "LIST_MIDS",
            ConnectorFunction::RenewMachineId => "RENEW_MID",
            ConnectorFunction::RevokeMachineId => "REVOKE_MID",
            ConnectorFunction::GetMachineIdStatus => "GET_MID_STATUS",
        }
    }

    /// Parameter list of the external function, parentheses included.
    pub fn sql_parameters(self) -> &'static str {
        match self {
            ConnectorFunction::GetMachineId | ConnectorFunction::RenewMachineId => {
                "(type varchar, tpp_url varchar, request_id varchar)"
            }
            ConnectorFunction::RequestMachineId => {
                "(type varchar, tpp_url varchar, dns array, zone varchar, upn array, common_name varchar)"
            }
            ConnectorFunction::ListMachineIds => "(type varchar, tpp_url varchar, zone varchar)",
            ConnectorFunction::RevokeMachineId => {
                "(type varchar, tpp_url varchar, request_id varchar, should_disable boolean)"
            }
            ConnectorFunction::GetMachineIdStatus => {
                "(type varchar, tpp_url varchar, zone varchar, common_name varchar)"
            }
        }
    }

    /// Human-readable label used in status output.
    pub fn label(self) -> &'static str {
        match self {
            ConnectorFunction::GetMachineId => "GetMachineId",
            ConnectorFunction::RequestMachineId => "RequestMachineId",
            ConnectorFunction::ListMachineIds => "ListMachineIds",
            ConnectorFunction::RenewMachineId => "RenewMachineId",
            ConnectorFunction::RevokeMachineId => "RevokeMachineId",
            ConnectorFunction::GetMachineIdStatus => "GetMachineIdStatus",
        }
    }
}

impl fmt::Display for ConnectorFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
