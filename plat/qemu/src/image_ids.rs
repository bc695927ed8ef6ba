/*++
Licensed under the Apache-2.0 license.

File Name:

    image_ids.rs

Abstract:

    Image identifiers and measured boot software type labels of the
    QEMU platform.

--*/

//
// Image identifiers
//
pub const BL2_IMAGE_ID: u32 = 1;
pub const SCP_BL2_IMAGE_ID: u32 = 2;
pub const BL31_IMAGE_ID: u32 = 3;
pub const BL32_IMAGE_ID: u32 = 4;
pub const BL33_IMAGE_ID: u32 = 5;
pub const BL32_EXTRA1_IMAGE_ID: u32 = 21;
pub const BL32_EXTRA2_IMAGE_ID: u32 = 22;
pub const HW_CONFIG_ID: u32 = 23;
pub const TB_FW_CONFIG_ID: u32 = 24;
pub const SOC_FW_CONFIG_ID: u32 = 25;
pub const TOS_FW_CONFIG_ID: u32 = 26;
pub const NT_FW_CONFIG_ID: u32 = 27;
pub const FW_CONFIG_ID: u32 = 31;
pub const RMM_IMAGE_ID: u32 = 35;

//
// Software type labels
//
pub const MBOOT_BL2_IMAGE_STRING: &str = "BL_2";
pub const MBOOT_BL31_IMAGE_STRING: &str = "BL_31";
pub const MBOOT_BL32_IMAGE_STRING: &str = "BL_32";
pub const MBOOT_BL32_EXTRA1_IMAGE_STRING: &str = "BL32_EXTRA1_IMAGE";
pub const MBOOT_BL32_EXTRA2_IMAGE_STRING: &str = "BL32_EXTRA2_IMAGE";
pub const MBOOT_BL33_IMAGE_STRING: &str = "BL_33";
pub const MBOOT_SCP_BL2_IMAGE_STRING: &str = "SCP_BL2_IMAGE";
pub const MBOOT_RMM_IMAGE_STRING: &str = "RMM";
pub const MBOOT_FW_CONFIG_STRING: &str = "FW_CONFIG";
pub const MBOOT_TB_FW_CONFIG_STRING: &str = "TB_FW_CONFIG";
pub const MBOOT_HW_CONFIG_STRING: &str = "HW_CONFIG";
pub const MBOOT_SOC_FW_CONFIG_STRING: &str = "SOC_FW_CONFIG";
pub const MBOOT_TOS_FW_CONFIG_STRING: &str = "TOS_FW_CONFIG";
pub const MBOOT_NT_FW_CONFIG_STRING: &str = "NT_FW_CONFIG";
