use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use ipmanager_engine::{Error, IpService};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{error, info};

use crate::types::{
    AddressResponse, CooldownResponse, GroupResponse, ReleaseRequest, UnusedAddressRequest,
    UnusedNetworkAddressRequest,
};

pub struct AppState {
    pub ip_service: IpService,
}

type ApiError = (StatusCode, String);

fn api_error(e: Error) -> ApiError {
    let status = match e {
        Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        Error::Cache(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status != StatusCode::BAD_REQUEST {
        error!("Address request failed: {}", e);
    }
    (status, e.to_string())
}

fn require<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| api_error(Error::InvalidArgument(format!("{} is required", field))))
}

fn address_response(address: Option<Ipv4Addr>) -> Json<AddressResponse> {
    Json(AddressResponse {
        address: address.map(|ip| ip.to_string()).unwrap_or_default(),
    })
}

/// POST /api/ip/groups/:name/unused - Find a free address in a named group
pub async fn unused_group_address(
    State(state): State<Arc<AppState>>,
    Path(group): Path<String>,
    Json(req): Json<UnusedAddressRequest>,
) -> Result<Json<AddressResponse>, ApiError> {
    let used = require(req.used_addresses, "used_addresses")?;

    let address = state
        .ip_service
        .unused_group_address(&group, &used)
        .await
        .map_err(api_error)?;

    if let Some(ip) = address {
        info!("Allocated {} from group {}", ip, group);
    }

    Ok(address_response(address))
}

/// POST /api/ip/networks/unused - Find a free address in a caller-described network
pub async fn unused_network_address(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UnusedNetworkAddressRequest>,
) -> Result<Json<AddressResponse>, ApiError> {
    let network = require(req.network, "network")?;
    let used = require(req.used_addresses, "used_addresses")?;

    let address = state
        .ip_service
        .unused_network_address(&network, &used)
        .await
        .map_err(api_error)?;

    if let Some(ip) = address {
        info!("Allocated {} from network {}", ip, network.name);
    }

    Ok(address_response(address))
}

/// POST /api/ip/networks/:name/unused - Find a free address in a configured network
pub async fn unused_configured_network_address(
    State(state): State<Arc<AppState>>,
    Path(network): Path<String>,
    Json(req): Json<UnusedAddressRequest>,
) -> Result<Json<AddressResponse>, ApiError> {
    let used = require(req.used_addresses, "used_addresses")?;

    let address = state
        .ip_service
        .unused_configured_network_address(&network, &used)
        .await
        .map_err(api_error)?;

    if let Some(ip) = address {
        info!("Allocated {} from network {}", ip, network);
    }

    Ok(address_response(address))
}

/// GET /api/ip/classify/:address - Group owning an address ("" if none)
pub async fn classify_address(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Json<GroupResponse> {
    Json(GroupResponse {
        group: state
            .ip_service
            .group_for_address(&address)
            .unwrap_or_default(),
    })
}

/// POST /api/ip/release - Put an address into cooldown
pub async fn release_address(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReleaseRequest>,
) -> StatusCode {
    let address = req.address.unwrap_or_default();
    state.ip_service.release(&address).await;

    StatusCode::NO_CONTENT
}

/// GET /api/ip/cooldown/:address - Whether an address is still cooling down
pub async fn cooldown_status(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<CooldownResponse>, ApiError> {
    let in_cooldown = state
        .ip_service
        .is_in_cooldown(&address)
        .await
        .map_err(api_error)?;

    Ok(Json(CooldownResponse {
        address,
        in_cooldown,
    }))
}
