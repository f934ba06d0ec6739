/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Shapes shared between operations

use aws_http::json_structure;
use smithy_types::Instant;

json_structure! {
    /// A key-value pair that can be associated with a resource
    Tag {
        key: String,
        value: String,
    }
}

json_structure! {
    /// A filter name and value pair used to return a more specific list of results.
    /// Filters are typically used with search operations.
    Filter {
        key: String,
        values: Vec<String>,
    }
}

json_structure! {
    /// An object representing a sort criteria
    Sort {
        key: String,
        /// `ASC` or `DESC`
        value: String,
    }
}

json_structure! {
    /// A room with attributes
    Room {
        room_arn: String,
        room_name: String,
        description: String,
        provider_calendar_id: String,
        profile_arn: String,
    }
}

json_structure! {
    /// The data of a room, as returned by `SearchRooms`
    RoomData {
        room_arn: String,
        room_name: String,
        description: String,
        provider_calendar_id: String,
        profile_arn: String,
        profile_name: String,
    }
}

json_structure! {
    /// A room profile with attributes
    Profile {
        profile_arn: String,
        profile_name: String,
        is_default: bool,
        address: String,
        timezone: String,
        /// `METRIC` or `IMPERIAL`
        distance_unit: String,
        /// `FAHRENHEIT` or `CELSIUS`
        temperature_unit: String,
        /// `ALEXA`, `AMAZON`, `ECHO` or `COMPUTER`
        wake_word: String,
        locale: String,
        setup_mode_disabled: bool,
        max_volume_limit: i32,
        #[serde(rename = "PSTNEnabled")]
        pstn_enabled: bool,
        address_book_arn: String,
    }
}

json_structure! {
    /// The data of a room profile, as returned by `SearchProfiles`
    ProfileData {
        profile_arn: String,
        profile_name: String,
        is_default: bool,
        address: String,
        timezone: String,
        distance_unit: String,
        temperature_unit: String,
        wake_word: String,
        locale: String,
    }
}

json_structure! {
    /// A skill group with attributes
    SkillGroup {
        skill_group_arn: String,
        skill_group_name: String,
        description: String,
    }
}

json_structure! {
    SkillGroupData {
        skill_group_arn: String,
        skill_group_name: String,
        description: String,
    }
}

json_structure! {
    /// A device with attributes
    Device {
        device_arn: String,
        device_serial_number: String,
        device_type: String,
        device_name: String,
        software_version: String,
        mac_address: String,
        room_arn: String,
        /// `READY`, `PENDING`, `WAS_OFFLINE`, `DEREGISTERED` or `FAILED`
        device_status: String,
        device_status_info: DeviceStatusInfo,
    }
}

json_structure! {
    /// Detailed information about a device's status
    DeviceStatusInfo {
        device_status_details: Vec<DeviceStatusDetail>,
        /// `ONLINE` or `OFFLINE`
        connection_status: String,
        connection_status_updated_time: Instant,
    }
}

json_structure! {
    DeviceStatusDetail {
        feature: String,
        code: String,
    }
}

json_structure! {
    /// Device attributes, as returned by `SearchDevices`
    DeviceData {
        device_arn: String,
        device_serial_number: String,
        device_type: String,
        device_name: String,
        software_version: String,
        mac_address: String,
        device_status: String,
        network_profile_arn: String,
        network_profile_name: String,
        room_arn: String,
        room_name: String,
        device_status_info: DeviceStatusInfo,
        created_time: Instant,
    }
}

json_structure! {
    /// An address book with attributes
    AddressBook {
        address_book_arn: String,
        name: String,
        description: String,
    }
}

json_structure! {
    /// A contact with attributes
    Contact {
        contact_arn: String,
        display_name: String,
        first_name: String,
        last_name: String,
        phone_number: String,
        phone_numbers: Vec<PhoneNumber>,
        sip_addresses: Vec<SipAddress>,
    }
}

json_structure! {
    /// The phone number for the contact containing the raw number and phone number type
    PhoneNumber {
        number: String,
        /// `MOBILE`, `WORK` or `HOME`
        #[serde(rename = "Type")]
        number_type: String,
    }
}

json_structure! {
    /// The SIP address for the contact containing the URI and SIP address type
    SipAddress {
        uri: String,
        /// `WORK`
        #[serde(rename = "Type")]
        address_type: String,
    }
}
