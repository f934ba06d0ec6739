/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Operations of Alexa For Business, their inputs and outputs

use crate::client::{Client, FluentBuilder};
use crate::model::{
    AddressBook, Contact, Device, DeviceData, Filter, PhoneNumber, Profile, ProfileData, Room,
    RoomData, SipAddress, SkillGroup, SkillGroupData, Sort, Tag,
};

aws_http::json_operations! {
    client = Client, fluent = FluentBuilder;

    /// Creates a room with the specified details.
    CreateRoom, create_room {
        input CreateRoomInput {
            room_name: String,
            description: String,
            profile_arn: String,
            provider_calendar_id: String,
            client_request_token: String,
            tags: Vec<Tag>,
        }
        required [room_name]
        output CreateRoomOutput { room_arn: String }
    }

    /// Gets room details by room ARN.
    GetRoom, get_room {
        input GetRoomInput { room_arn: String }
        required []
        output GetRoomOutput { room: Room }
    }

    /// Updates room details by room ARN.
    UpdateRoom, update_room {
        input UpdateRoomInput {
            room_arn: String,
            room_name: String,
            description: String,
            provider_calendar_id: String,
            profile_arn: String,
        }
        required []
        output UpdateRoomOutput {}
    }

    /// Deletes a room by the room ARN.
    DeleteRoom, delete_room {
        input DeleteRoomInput { room_arn: String }
        required []
        output DeleteRoomOutput {}
    }

    /// Searches rooms and lists the ones that meet a set of filter and sort criteria.
    SearchRooms, search_rooms {
        input SearchRoomsInput {
            next_token: String,
            max_results: i32,
            filters: Vec<Filter>,
            sort_criteria: Vec<Sort>,
        }
        required []
        output SearchRoomsOutput {
            rooms: Vec<RoomData>,
            next_token: String,
            total_count: i32,
        }
    }

    /// Creates a new room profile with the specified details.
    CreateProfile, create_profile {
        input CreateProfileInput {
            profile_name: String,
            timezone: String,
            address: String,
            distance_unit: String,
            temperature_unit: String,
            wake_word: String,
            locale: String,
            client_request_token: String,
            setup_mode_disabled: bool,
            max_volume_limit: i32,
            #[serde(rename = "PSTNEnabled")]
            pstn_enabled: bool,
            tags: Vec<Tag>,
        }
        required [profile_name, timezone, address, distance_unit, temperature_unit, wake_word]
        output CreateProfileOutput { profile_arn: String }
    }

    /// Gets the details of a room profile by profile ARN.
    GetProfile, get_profile {
        input GetProfileInput { profile_arn: String }
        required []
        output GetProfileOutput { profile: Profile }
    }

    /// Updates an existing room profile by room profile ARN.
    UpdateProfile, update_profile {
        input UpdateProfileInput {
            profile_arn: String,
            profile_name: String,
            is_default: bool,
            timezone: String,
            address: String,
            distance_unit: String,
            temperature_unit: String,
            wake_word: String,
            locale: String,
            setup_mode_disabled: bool,
            max_volume_limit: i32,
            #[serde(rename = "PSTNEnabled")]
            pstn_enabled: bool,
        }
        required []
        output UpdateProfileOutput {}
    }

    /// Deletes a room profile by the profile ARN.
    DeleteProfile, delete_profile {
        input DeleteProfileInput { profile_arn: String }
        required []
        output DeleteProfileOutput {}
    }

    /// Searches room profiles and lists the ones that meet a set of filter criteria.
    SearchProfiles, search_profiles {
        input SearchProfilesInput {
            next_token: String,
            max_results: i32,
            filters: Vec<Filter>,
            sort_criteria: Vec<Sort>,
        }
        required []
        output SearchProfilesOutput {
            profiles: Vec<ProfileData>,
            next_token: String,
            total_count: i32,
        }
    }

    /// Creates a skill group with a specified name and description.
    CreateSkillGroup, create_skill_group {
        input CreateSkillGroupInput {
            skill_group_name: String,
            description: String,
            client_request_token: String,
            tags: Vec<Tag>,
        }
        required [skill_group_name]
        output CreateSkillGroupOutput { skill_group_arn: String }
    }

    /// Gets skill group details by skill group ARN.
    GetSkillGroup, get_skill_group {
        input GetSkillGroupInput { skill_group_arn: String }
        required []
        output GetSkillGroupOutput { skill_group: SkillGroup }
    }

    /// Deletes a skill group by skill group ARN.
    DeleteSkillGroup, delete_skill_group {
        input DeleteSkillGroupInput { skill_group_arn: String }
        required []
        output DeleteSkillGroupOutput {}
    }

    /// Searches skill groups and lists the ones that meet a set of filter and sort criteria.
    SearchSkillGroups, search_skill_groups {
        input SearchSkillGroupsInput {
            next_token: String,
            max_results: i32,
            filters: Vec<Filter>,
            sort_criteria: Vec<Sort>,
        }
        required []
        output SearchSkillGroupsOutput {
            skill_groups: Vec<SkillGroupData>,
            next_token: String,
            total_count: i32,
        }
    }

    /// Associates a skill group with a given room. This enables all skills in the associated
    /// skill group on all devices in the room.
    AssociateSkillGroupWithRoom, associate_skill_group_with_room {
        input AssociateSkillGroupWithRoomInput {
            skill_group_arn: String,
            room_arn: String,
        }
        required []
        output AssociateSkillGroupWithRoomOutput {}
    }

    /// Disassociates a skill group from a specified room. This disables all skills in the skill
    /// group on all devices in the room.
    DisassociateSkillGroupFromRoom, disassociate_skill_group_from_room {
        input DisassociateSkillGroupFromRoomInput {
            skill_group_arn: String,
            room_arn: String,
        }
        required []
        output DisassociateSkillGroupFromRoomOutput {}
    }

    /// Gets the details of a device by device ARN.
    GetDevice, get_device {
        input GetDeviceInput { device_arn: String }
        required []
        output GetDeviceOutput { device: Device }
    }

    /// Searches devices and lists the ones that meet a set of filter criteria.
    SearchDevices, search_devices {
        input SearchDevicesInput {
            next_token: String,
            max_results: i32,
            filters: Vec<Filter>,
            sort_criteria: Vec<Sort>,
        }
        required []
        output SearchDevicesOutput {
            devices: Vec<DeviceData>,
            next_token: String,
            total_count: i32,
        }
    }

    /// Associates a device with a given room. This applies all the settings from the room
    /// profile to the device, and all the skills in any skill groups added to that room.
    AssociateDeviceWithRoom, associate_device_with_room {
        input AssociateDeviceWithRoomInput {
            device_arn: String,
            room_arn: String,
        }
        required []
        output AssociateDeviceWithRoomOutput {}
    }

    /// Disassociates a device from its current room. The device continues to be connected to
    /// the Wi-Fi network and is still registered to the account.
    DisassociateDeviceFromRoom, disassociate_device_from_room {
        input DisassociateDeviceFromRoomInput { device_arn: String }
        required []
        output DisassociateDeviceFromRoomOutput {}
    }

    /// Removes a device from Alexa For Business.
    DeleteDevice, delete_device {
        input DeleteDeviceInput { device_arn: String }
        required [device_arn]
        output DeleteDeviceOutput {}
    }

    /// Resets a device and its account to the known default settings, by clearing all
    /// information and settings set by previous users.
    StartDeviceSync, start_device_sync {
        input StartDeviceSyncInput {
            room_arn: String,
            device_arn: String,
            /// `BLUETOOTH`, `VOLUME`, `NOTIFICATIONS`, `LISTS`, `SKILLS`, `NETWORK_PROFILE`,
            /// `SETTINGS` or `ALL`
            features: Vec<String>,
        }
        required [features]
        output StartDeviceSyncOutput {}
    }

    /// Creates an address book with the specified details.
    CreateAddressBook, create_address_book {
        input CreateAddressBookInput {
            name: String,
            description: String,
            client_request_token: String,
            tags: Vec<Tag>,
        }
        required [name]
        output CreateAddressBookOutput { address_book_arn: String }
    }

    /// Gets address the book details by the address book ARN.
    GetAddressBook, get_address_book {
        input GetAddressBookInput { address_book_arn: String }
        required [address_book_arn]
        output GetAddressBookOutput { address_book: AddressBook }
    }

    /// Deletes an address book by the address book ARN.
    DeleteAddressBook, delete_address_book {
        input DeleteAddressBookInput { address_book_arn: String }
        required [address_book_arn]
        output DeleteAddressBookOutput {}
    }

    /// Creates a contact with the specified details.
    CreateContact, create_contact {
        input CreateContactInput {
            display_name: String,
            first_name: String,
            last_name: String,
            phone_number: String,
            phone_numbers: Vec<PhoneNumber>,
            sip_addresses: Vec<SipAddress>,
            client_request_token: String,
            tags: Vec<Tag>,
        }
        required [first_name]
        output CreateContactOutput { contact_arn: String }
    }

    /// Gets the contact details by the contact ARN.
    GetContact, get_contact {
        input GetContactInput { contact_arn: String }
        required [contact_arn]
        output GetContactOutput { contact: Contact }
    }

    /// Deletes a contact by the contact ARN.
    DeleteContact, delete_contact {
        input DeleteContactInput { contact_arn: String }
        required [contact_arn]
        output DeleteContactOutput {}
    }

    /// Associates a contact with a given address book.
    AssociateContactWithAddressBook, associate_contact_with_address_book {
        input AssociateContactWithAddressBookInput {
            contact_arn: String,
            address_book_arn: String,
        }
        required [contact_arn, address_book_arn]
        output AssociateContactWithAddressBookOutput {}
    }

    /// Adds metadata tags to a specified resource.
    TagResource, tag_resource {
        input TagResourceInput {
            arn: String,
            tags: Vec<Tag>,
        }
        required [arn, tags]
        output TagResourceOutput {}
    }

    /// Removes metadata tags from a specified resource.
    UntagResource, untag_resource {
        input UntagResourceInput {
            arn: String,
            tag_keys: Vec<String>,
        }
        required [arn, tag_keys]
        output UntagResourceOutput {}
    }

    /// Lists all tags for the specified resource.
    ListTags, list_tags {
        input ListTagsInput {
            arn: String,
            next_token: String,
            max_results: i32,
        }
        required [arn]
        output ListTagsOutput {
            tags: Vec<Tag>,
            next_token: String,
        }
    }
}
